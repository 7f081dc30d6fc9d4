//! Pokédex catalog browser - terminal front end for the public PokeAPI

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventOutcome, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api::{self, CatalogClient};
use pokedex::effect::Effect;
use pokedex::reducer::reducer;
use pokedex::route::{Route, ViewState};
use pokedex::state::AppState;
use pokedex::ui::Ui;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ViewArg {
    Pagination,
    Loadmore,
}

/// Pokédex TUI - browse the public Pokémon catalog
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse the Pokémon catalog with pagination or load-more")]
struct Args {
    /// Initial browse mode
    #[arg(long, value_enum, default_value = "pagination")]
    view: ViewArg,

    /// Initial 1-based page (pagination mode only)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,

    /// Entries per catalog page
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,

    /// Catalog API base URL
    #[arg(long, default_value = api::API_BASE)]
    api_base: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

fn initial_location(view: ViewArg, page: u32) -> String {
    let route = match view {
        ViewArg::Pagination => Route::Browse(ViewState::paginated(page)),
        ViewArg::Loadmore => Route::Browse(ViewState::incremental()),
    };
    route.to_location()
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        view,
        page,
        page_size,
        api_base,
        debug: debug_args,
    } = Args::parse();

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(page_size, initial_location(view, page)))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // The query caches live for the whole process; every effect goes through
    // this one client.
    let client = Arc::new(CatalogClient::new(api_base));

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, client, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    client: Arc<CatalogClient>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(Ui::new()));
    let render_ui = Rc::clone(&ui);
    let event_ui = Rc::clone(&ui);

    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(120), || Action::Tick);
            },
            move |frame, area, state, render_ctx: RenderContext| {
                render_ui.borrow_mut().render(frame, area, state, render_ctx);
            },
            move |event, state| -> EventOutcome<Action> {
                event_ui.borrow_mut().handle_event(event, state)
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx: &mut EffectContext<Action>| handle_effect(&client, effect, ctx),
        )
        .await
}

/// Handle effects by spawning keyed tasks through the shared client. The
/// client's query caches de-duplicate identical in-flight requests and serve
/// fresh hits without touching the network.
fn handle_effect(client: &Arc<CatalogClient>, effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadPage { limit, offset } => {
            let client = Arc::clone(client);
            ctx.tasks().spawn(TaskKey::new(format!("page_{offset}")), async move {
                match client.page(limit, offset).await {
                    Ok(page) => Action::PageDidLoad { offset, page },
                    Err(error) => Action::PageDidError {
                        offset,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadFeedPage { limit, offset } => {
            let client = Arc::clone(client);
            ctx.tasks().spawn(TaskKey::new(format!("feed_{offset}")), async move {
                match client.page(limit, offset).await {
                    Ok(page) => Action::FeedDidLoad { offset, page },
                    Err(error) => Action::FeedDidError {
                        offset,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadDetail { id } => {
            let client = Arc::clone(client);
            ctx.tasks().spawn(TaskKey::new(format!("detail_{id}")), async move {
                match client.detail(id).await {
                    Ok(detail) => Action::DetailDidLoad(detail),
                    Err(error) => Action::DetailDidError {
                        id,
                        error: error.to_string(),
                    },
                }
            });
        }
    }
}
