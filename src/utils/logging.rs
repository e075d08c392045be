use tracing::{error, info, warn, debug};

/// Logs the start of a user action with consistent format
pub fn log_action_start(action: &str, user_id: u64, details: Option<&str>) {
    match details {
        Some(d) => info!("ACTION_START: {} by {} - {}", action, user_id, d),
        None => info!("ACTION_START: {} by {}", action, user_id),
    }
}

/// Logs action completion with consistent format
pub fn log_action_success(action: &str, user_id: u64, details: Option<&str>) {
    match details {
        Some(d) => info!("ACTION_SUCCESS: {} by {} - {}", action, user_id, d),
        None => info!("ACTION_SUCCESS: {} by {}", action, user_id),
    }
}

/// Logs action errors with consistent format
pub fn log_action_error(action: &str, user_id: u64, error: &str) {
    error!("ACTION_ERROR: {} by {} - {}", action, user_id, error);
}

/// Logs rejected admin input
pub fn log_validation_error(action: &str, value: &str, error: &str, user_id: u64) {
    warn!(
        "VALIDATION_ERROR: {} - input '{}' invalid: {} - user {}",
        action, value, error, user_id
    );
}

/// Logs database operations with consistent format
pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

/// Logs a broadcast outcome
pub fn log_broadcast_summary(user_id: u64, delivered: usize, failed: usize) {
    if failed > 0 {
        warn!(
            "BROADCAST: by {} - {} delivered, {} failed",
            user_id, delivered, failed
        );
    } else {
        info!("BROADCAST: by {} - {} delivered", user_id, delivered);
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
