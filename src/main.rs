use log::{error, info};
use recipe_feed::filter::{FilterPatch, CUISINES, DIETS, MEAL_TYPES};
use recipe_feed::{open_browser, FeedConfig, ObservationId, RecipeId, VisibilityNotifier};
use std::env;

/// Terminal stand-in for a scrolling viewport: remembers the single live
/// observation so the CLI can "scroll" to it
#[derive(Default)]
struct TerminalViewport {
    next: u64,
    live: Option<ObservationId>,
}

impl VisibilityNotifier for TerminalViewport {
    fn observe(&mut self, _target: &RecipeId) -> ObservationId {
        self.next += 1;
        let id = ObservationId(self.next);
        self.live = Some(id);
        id
    }

    fn disconnect(&mut self, observation: ObservationId) {
        if self.live == Some(observation) {
            self.live = None;
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    pages: u32,
    search: Option<String>,
    filters: Vec<FilterPatch>,
    toggle: Vec<RecipeId>,
}

fn usage() -> &'static str {
    "Usage: recipe-feed [--pages N] [--search TEXT] [--cuisine C] [--diet D] \
     [--meal-type M] [--max-minutes N] [--toggle ID]..."
}

/// Accept `value` only if it names one of the options in `catalog`
fn choose(flag: &str, value: String, catalog: &[&str]) -> Result<String, String> {
    if catalog.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(format!(
            "invalid {} '{}' (expected one of: {})",
            flag,
            value,
            catalog.join(", ")
        ))
    }
}

fn parse_args(raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args {
        pages: 1,
        ..Default::default()
    };
    let mut raw = raw;

    while let Some(flag) = raw.next() {
        let mut value = || raw.next().ok_or_else(|| format!("{} needs a value", flag));
        match flag.as_str() {
            "--pages" => {
                args.pages = value()?
                    .parse()
                    .map_err(|e| format!("invalid --pages: {}", e))?;
            }
            "--search" => args.search = Some(value()?),
            "--cuisine" => {
                let cuisine = choose(&flag, value()?, CUISINES)?;
                args.filters.push(FilterPatch::cuisine(Some(&cuisine)));
            }
            "--diet" => {
                let diet = choose(&flag, value()?, DIETS)?;
                args.filters.push(FilterPatch::diet(Some(&diet)));
            }
            "--meal-type" => {
                let meal_type = choose(&flag, value()?, MEAL_TYPES)?;
                args.filters.push(FilterPatch::meal_type(Some(&meal_type)));
            }
            "--max-minutes" => {
                let minutes = value()?
                    .parse()
                    .map_err(|e| format!("invalid --max-minutes: {}", e))?;
                args.filters.push(FilterPatch::max_ready_minutes(Some(minutes)));
            }
            "--toggle" => args.toggle.push(RecipeId::parse(&value()?)),
            "-h" | "--help" => return Err(usage().to_string()),
            other => return Err(format!("unknown argument '{}'\n{}", other, usage())),
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = parse_args(env::args().skip(1))?;
    let config = FeedConfig::load()?;
    let mut browser = open_browser(&config, TerminalViewport::default()).await?;

    if let Some(search) = args.search {
        browser.set_search_text(search);
    }
    for patch in args.filters {
        browser.apply_filter_patch(patch);
    }

    // Scroll to the bottom once per extra page
    for _ in 1..args.pages {
        let Some(observation) = browser.notifier().live else {
            info!("Nothing left to scroll to");
            break;
        };
        browser.handle_visibility(observation, false).await?;
        if let Err(e) = browser.handle_visibility(observation, true).await {
            error!("Loading more recipes failed: {}", e);
            break;
        }
    }

    for id in args.toggle {
        let now = browser.toggle_favorite(id.clone());
        println!("{} {}", if now { "Favorited" } else { "Unfavorited" }, id);
    }

    let displayed = browser.displayed();
    if displayed.is_empty() {
        println!("No recipes found. Try adjusting your filters.");
    }
    for recipe in displayed {
        let heart = if browser.is_favorite(&recipe.id) { "♥" } else { " " };
        println!(
            "{} [{}] {} ({} min, {} servings)",
            heart,
            recipe.id,
            recipe.title,
            recipe.display_minutes(),
            recipe.display_servings()
        );
    }
    if let Some(message) = browser.last_error() {
        eprintln!("warning: {}", message);
    }

    Ok(())
}
