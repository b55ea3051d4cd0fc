// Stable error codes shared by the HTTP API and the CLI

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
}

pub mod import {
    pub const FILE_NOT_FOUND: &str = "IMPORT_2001";
    pub const UNREADABLE_FILE: &str = "IMPORT_2002";
    pub const ABORTED: &str = "IMPORT_2003";
}

pub mod resource {
    pub const NOT_FOUND: &str = "RESOURCE_3001";
}

pub mod database {
    pub const CONNECTION_FAILED: &str = "DB_4001";
    pub const QUERY_FAILED: &str = "DB_4002";
    pub const CONSTRAINT_VIOLATION: &str = "DB_4003";
    pub const MIGRATION_FAILED: &str = "DB_4004";
}

pub mod system {
    pub const CONFIGURATION: &str = "SYS_5001";
    pub const NETWORK: &str = "SYS_5002";
    pub const INTERNAL: &str = "SYS_5003";
}
