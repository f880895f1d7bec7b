//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Beacon Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[presence]
# service_url = "https://presence.beacon.dev/api/v1"
# initialize_worker = false   # start the worker as soon as the host is ready
# subscription_ttl = 600      # seconds, 60-86400
# request_timeout = 30        # seconds, 1-300
# connect_timeout = 10        # seconds, 1-60

[worker]
# groundskeeper_interval = 20 # seconds, 5-3600
# renew_margin = 60           # seconds, 0-3600
# event_capacity = 256        # 16-65536

[logging]
# level = "info"              # trace, debug, info, warn, error
"##
}
