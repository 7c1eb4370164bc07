/// Default content written to `settings.conf` on first run.
pub const SETTINGS_SKELETON_CONTENT: &str = "# Lisan settings
# Format: key = value (one per line). Lines starting with # are comments.

# REST API base URL; every request appends the resource path and ?locale=<ar|en>
api_base_url = http://localhost:8000/api

# Per-request timeout in seconds (failed fetches show a connection error)
request_timeout_secs = 30

# Quiet period after the last keystroke before a search is sent
search_debounce_ms = 500

# Interface and content language: ar, en, or empty to follow the system locale
locale =

# Theme: dark, light, or system
theme = system

# Remembered dark-mode toggle (written by the application)
# dark_mode = false

# Optional directory with ar.yml / en.yml message overrides
# locales_dir = /usr/share/lisan/locales

# Cache identical section responses for this many seconds (0 disables)
response_cache_ttl_secs = 0
";
