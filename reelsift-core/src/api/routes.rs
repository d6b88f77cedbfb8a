/// Backend routes, relative to `{base_url}/api/{version}`.
pub mod dedupe {
    pub const POLICY: &str = "/dedupe/policy";
    pub const TASKS: &str = "/dedupe/tasks";
    pub const SCAN: &str = "/dedupe/scan";
    pub const EXECUTE: &str = "/dedupe/tasks/execute";
    pub const IGNORE: &str = "/dedupe/tasks/ignore";
    pub const REMOVE: &str = "/dedupe/tasks/remove";
}

pub mod libraries {
    pub const COLLECTION: &str = "/libraries";
}

pub const DEFAULT_VERSION: &str = "v1";
