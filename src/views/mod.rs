//! Views: what each page loads and what it shows.
//!
//! A page loads its data through operations, then its view model is projected
//! from the store with selectors. View models are plain serializable data;
//! turning them into markup is left to whatever front end consumes them.

pub mod create_log;

use serde::Serialize;

use crate::auth::stored_auth_settings;
use crate::models::{
    Attachment, ListQuery, Log, LogDraft, Run, SubsystemOverview, Token, User,
};
use crate::operations::{
    fetch_attachments, fetch_logs, fetch_profile, fetch_run, fetch_runs, fetch_subsystem_overviews,
    fetch_tokens, fetch_user, fetch_user_logs,
};
use crate::routes::{LayoutKind, Page, ResolvedRoute};
use crate::selectors::*;
use crate::store::{ErrorRecord, RootState};
use crate::AppContext;

use create_log::CreateLogTarget;

/// Entry of the top navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub href: &'static str,
    pub name: &'static str,
    pub active: bool,
}

const NAV_ITEMS: [(&str, &str); 3] = [
    ("/logs", "Logs"),
    ("/runs", "Runs"),
    ("/logs/create", "Create new run"),
];

/// Frame around the page body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "camelCase")]
pub enum LayoutModel {
    #[serde(rename_all = "camelCase")]
    Main {
        nav: Vec<NavItem>,
        profile_name: Option<String>,
        errors: Vec<ErrorRecord>,
    },
    Unauthorized {
        errors: Vec<ErrorRecord>,
    },
}

/// What a page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum ViewModel {
    #[serde(rename_all = "camelCase")]
    Logs {
        logs: Vec<Log>,
        count: u64,
        is_fetching: bool,
    },
    #[serde(rename_all = "camelCase")]
    Runs {
        runs: Vec<Run>,
        count: u64,
        is_fetching: bool,
    },
    #[serde(rename_all = "camelCase")]
    Run {
        run_number: u64,
        run: Option<Run>,
        is_fetching: bool,
    },
    #[serde(rename_all = "camelCase")]
    Log {
        log_id: u64,
        log: Option<Log>,
        comments: Vec<Log>,
        attachments: Vec<Attachment>,
        comment_draft: Option<LogDraft>,
        is_fetching: bool,
    },
    #[serde(rename_all = "camelCase")]
    CreateLog {
        run_number: Option<u64>,
        draft: Option<LogDraft>,
    },
    #[serde(rename_all = "camelCase")]
    Subsystems {
        overviews: Vec<SubsystemOverview>,
        is_fetching: bool,
    },
    #[serde(rename_all = "camelCase")]
    Tokens {
        tokens: Vec<Token>,
        created: Option<Token>,
        is_fetching: bool,
    },
    #[serde(rename_all = "camelCase")]
    Profile {
        user_id: u64,
        user: Option<User>,
        logs: Vec<Log>,
        log_count: u64,
        is_fetching_user: bool,
        is_fetching_logs: bool,
    },
    Loader,
    #[serde(rename_all = "camelCase")]
    Login {
        use_cern_sso: bool,
        auth_url: Option<String>,
    },
}

/// A rendered page: layout plus body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub route: String,
    pub layout: LayoutModel,
    pub body: ViewModel,
}

impl Page {
    /// Fetch what the page needs. Failures end up in the error log.
    pub async fn load(&self, ctx: &AppContext) {
        match self {
            Page::Logs { query } => {
                let _ = fetch_logs(ctx, query).await;
            }
            Page::Runs { query } => {
                let _ = fetch_runs(ctx, query).await;
            }
            Page::Run { run_number } => {
                let _ = fetch_run(ctx, *run_number).await;
            }
            Page::Log { log_id } => {
                let target = CreateLogTarget::Comment { parent_id: *log_id };
                if create_log::init(ctx, target).await.is_err() {
                    return;
                }
                let root = ctx
                    .store
                    .select(|s| select_current_log(s).map(Log::thread_root_id))
                    .unwrap_or(*log_id);
                let thread = ListQuery::default().filter("rootId", root.to_string());
                let _ = tokio::join!(fetch_logs(ctx, &thread), fetch_attachments(ctx, *log_id));
            }
            Page::CreateLog { run_number } => {
                let _ = create_log::init(ctx, CreateLogTarget::Run(*run_number)).await;
            }
            Page::Subsystems => {
                let _ = fetch_subsystem_overviews(ctx).await;
            }
            Page::Tokens => {
                if ctx.store.select(select_profile_user_id).is_none()
                    && fetch_profile(ctx).await.is_err()
                {
                    return;
                }
                if let Some(user_id) = ctx.store.select(select_profile_user_id) {
                    let _ = fetch_tokens(ctx, user_id).await;
                }
            }
            Page::Profile { user_id } => {
                let query = ListQuery::default();
                let _ = tokio::join!(
                    fetch_user(ctx, *user_id),
                    fetch_user_logs(ctx, *user_id, &query)
                );
            }
            Page::Loader | Page::Login => {}
        }
    }

    /// Project the page's view model out of `state`.
    pub fn render(&self, state: &RootState, ctx: &AppContext) -> ViewModel {
        match self {
            Page::Logs { .. } => ViewModel::Logs {
                logs: select_logs(state).to_vec(),
                count: select_log_count(state),
                is_fetching: select_is_fetching_logs(state),
            },
            Page::Runs { .. } => ViewModel::Runs {
                runs: select_runs(state).to_vec(),
                count: select_run_count(state),
                is_fetching: select_is_fetching_runs(state),
            },
            Page::Run { run_number } => ViewModel::Run {
                run_number: *run_number,
                run: select_current_run(state)
                    .filter(|r| r.run_number == *run_number)
                    .cloned(),
                is_fetching: select_is_fetching_run(state),
            },
            Page::Log { log_id } => ViewModel::Log {
                log_id: *log_id,
                log: select_current_log(state)
                    .filter(|l| l.log_id == *log_id)
                    .cloned(),
                comments: select_thread_comments(state).into_iter().cloned().collect(),
                attachments: select_attachments(state).to_vec(),
                comment_draft: select_log_draft(state).cloned(),
                is_fetching: select_is_fetching_log(state)
                    || select_is_fetching_attachments(state),
            },
            Page::CreateLog { run_number } => ViewModel::CreateLog {
                run_number: *run_number,
                draft: select_log_draft(state).cloned(),
            },
            Page::Subsystems => ViewModel::Subsystems {
                overviews: select_subsystem_overviews(state).to_vec(),
                is_fetching: select_is_fetching_subsystem_overviews(state),
            },
            Page::Tokens => ViewModel::Tokens {
                tokens: select_tokens(state).to_vec(),
                created: select_created_token(state).cloned(),
                is_fetching: select_is_fetching_tokens(state),
            },
            Page::Profile { user_id } => ViewModel::Profile {
                user_id: *user_id,
                user: select_current_user(state)
                    .filter(|u| u.user_id == *user_id)
                    .cloned(),
                logs: select_user_logs(state).to_vec(),
                log_count: select_user_log_count(state),
                is_fetching_user: select_is_fetching_user(state),
                is_fetching_logs: select_is_fetching_user_logs(state),
            },
            Page::Loader => ViewModel::Loader,
            Page::Login => {
                let settings = stored_auth_settings(ctx.storage.as_ref());
                ViewModel::Login {
                    use_cern_sso: settings.as_ref().is_some_and(|s| s.use_cern_sso),
                    auth_url: settings.map(|s| s.auth_url),
                }
            }
        }
    }
}

fn render_layout(kind: LayoutKind, state: &RootState) -> LayoutModel {
    let errors = select_errors(state).to_vec();
    match kind {
        LayoutKind::Main => {
            let route = select_route(state);
            let path = route.split('?').next().unwrap_or(route);
            LayoutModel::Main {
                nav: NAV_ITEMS
                    .iter()
                    .map(|&(href, name)| NavItem {
                        href,
                        name,
                        active: path == href,
                    })
                    .collect(),
                profile_name: select_profile(state).and_then(|p| {
                    p.profile_data
                        .name
                        .clone()
                        .or_else(|| p.user_data.name.clone())
                }),
                errors,
            }
        }
        LayoutKind::Unauthorized => LayoutModel::Unauthorized { errors },
    }
}

/// Render a resolved route from the current store state.
pub fn render(route: &ResolvedRoute, ctx: &AppContext) -> Screen {
    let state = ctx.store.snapshot();
    Screen {
        route: route.path.clone(),
        layout: render_layout(route.layout, &state),
        body: route.page.render(&state, ctx),
    }
}
