//! Endpoint paths, relative to the configured API base URL.

pub fn setting() -> &'static str {
    "setting"
}

pub fn runs() -> &'static str {
    "runs"
}

pub fn run(run_number: u64) -> String {
    format!("runs/{}", run_number)
}

pub fn logs() -> &'static str {
    "logs"
}

pub fn log(log_id: u64) -> String {
    format!("logs/{}", log_id)
}

pub fn log_runs(log_id: u64) -> String {
    format!("logs/{}/runs", log_id)
}

pub fn log_attachments(log_id: u64) -> String {
    format!("logs/{}/attachments", log_id)
}

pub fn attachments() -> &'static str {
    "attachments"
}

pub fn overview() -> &'static str {
    "overview"
}

pub fn user(user_id: u64) -> String {
    format!("users/{}", user_id)
}

pub fn user_logs(user_id: u64) -> String {
    format!("users/{}/logs", user_id)
}

pub fn user_tokens(user_id: u64) -> String {
    format!("users/{}/tokens", user_id)
}

pub fn profile() -> &'static str {
    "user/profile"
}
