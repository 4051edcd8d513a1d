//! Pure read accessors over [`RootState`].

use crate::models::{Attachment, Log, LogDraft, Profile, Run, SubsystemOverview, Token, User};
use crate::store::{ErrorRecord, RootState};

// Runs
pub fn select_runs(state: &RootState) -> &[Run] {
    &state.runs.list
}
pub fn select_run_count(state: &RootState) -> u64 {
    state.runs.count
}
pub fn select_current_run(state: &RootState) -> Option<&Run> {
    state.runs.current.as_ref()
}
pub fn select_is_fetching_runs(state: &RootState) -> bool {
    state.runs.is_fetching
}
pub fn select_is_fetching_run(state: &RootState) -> bool {
    state.runs.is_fetching
}

// Logs
pub fn select_logs(state: &RootState) -> &[Log] {
    &state.logs.list
}
pub fn select_log_count(state: &RootState) -> u64 {
    state.logs.count
}
pub fn select_current_log(state: &RootState) -> Option<&Log> {
    state.logs.current.as_ref()
}
pub fn select_is_fetching_logs(state: &RootState) -> bool {
    state.logs.is_fetching
}
pub fn select_is_fetching_log(state: &RootState) -> bool {
    state.logs.is_fetching
}
pub fn select_log_draft(state: &RootState) -> Option<&LogDraft> {
    state.draft.as_ref()
}

/// Comments in the current log's thread, oldest first.
pub fn select_thread_comments(state: &RootState) -> Vec<&Log> {
    let Some(current) = select_current_log(state) else {
        return Vec::new();
    };
    let root = current.thread_root_id();
    let mut comments: Vec<&Log> = state
        .logs
        .list
        .iter()
        .filter(|l| l.is_comment() && l.thread_root_id() == root && l.log_id != current.log_id)
        .collect();
    comments.sort_by_key(|l| l.creation_time);
    comments
}

// Users
pub fn select_current_user(state: &RootState) -> Option<&User> {
    state.users.current.as_ref()
}
pub fn select_is_fetching_user(state: &RootState) -> bool {
    state.users.is_fetching
}
pub fn select_user_logs(state: &RootState) -> &[Log] {
    &state.user_logs.list
}
pub fn select_user_log_count(state: &RootState) -> u64 {
    state.user_logs.count
}
pub fn select_is_fetching_user_logs(state: &RootState) -> bool {
    state.user_logs.is_fetching
}

// Profile
pub fn select_profile(state: &RootState) -> Option<&Profile> {
    state.profile.current.as_ref()
}
pub fn select_profile_user_id(state: &RootState) -> Option<u64> {
    select_profile(state).map(|p| p.user_data.user_id)
}
pub fn select_is_fetching_profile(state: &RootState) -> bool {
    state.profile.is_fetching
}

// Subsystem overview
pub fn select_subsystem_overviews(state: &RootState) -> &[SubsystemOverview] {
    &state.overviews.list
}
pub fn select_is_fetching_subsystem_overviews(state: &RootState) -> bool {
    state.overviews.is_fetching
}

// Tokens
pub fn select_tokens(state: &RootState) -> &[Token] {
    &state.tokens.list
}
/// The token created last; the only time its secret is visible.
pub fn select_created_token(state: &RootState) -> Option<&Token> {
    state.tokens.current.as_ref().filter(|t| t.token.is_some())
}
pub fn select_is_fetching_tokens(state: &RootState) -> bool {
    state.tokens.is_fetching
}

// Attachments
pub fn select_attachments(state: &RootState) -> &[Attachment] {
    &state.attachments.list
}
pub fn select_is_fetching_attachments(state: &RootState) -> bool {
    state.attachments.is_fetching
}

// Errors
pub fn select_errors(state: &RootState) -> &[ErrorRecord] {
    &state.errors.records
}
pub fn select_has_errors(state: &RootState) -> bool {
    !state.errors.is_empty()
}

pub fn select_route(state: &RootState) -> &str {
    &state.route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogOrigin, LogSubtype};
    use crate::store::{Action, EntityAction};
    use chrono::{TimeZone, Utc};

    fn log(log_id: u64, root: Option<u64>, minute: u32) -> Log {
        Log {
            log_id,
            subtype: if root.is_some() { LogSubtype::Comment } else { LogSubtype::Run },
            origin: LogOrigin::Human,
            creation_time: Utc.with_ymd_and_hms(2018, 11, 2, 9, minute, 0).unwrap(),
            title: format!("log {}", log_id),
            text: String::new(),
            user_id: None,
            user: None,
            comment_fk_parent_log_id: root,
            comment_fk_root_log_id: root,
            runs: Vec::new(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_thread_comments_sorted_and_scoped() {
        let mut state = RootState::default();
        state.reduce(Action::Logs(EntityAction::ListSuccess {
            items: vec![
                log(1, None, 0),
                log(3, Some(1), 9),
                log(2, Some(1), 5),
                log(4, Some(8), 1),
            ],
            count: 4,
        }));
        state.reduce(Action::Logs(EntityAction::OneSuccess(log(1, None, 0))));

        let ids: Vec<u64> = select_thread_comments(&state).iter().map(|l| l.log_id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(select_log_count(&state), 4);
    }

    #[test]
    fn test_empty_state_selectors() {
        let state = RootState::default();
        assert!(select_runs(&state).is_empty());
        assert!(select_current_run(&state).is_none());
        assert!(!select_is_fetching_run(&state));
        assert!(select_profile_user_id(&state).is_none());
        assert!(select_created_token(&state).is_none());
        assert!(!select_has_errors(&state));
        assert_eq!(select_route(&state), "/");
        assert!(select_thread_comments(&state).is_empty());
    }
}
