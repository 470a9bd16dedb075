pub struct DefaultConfig;

impl DefaultConfig {
    pub fn create_default_config_file() -> String {
        r#"[server]
host = "0.0.0.0"
port = 8000
# Browser origins allowed to call /generate; use ["*"] to allow any
cors_origins = ["http://localhost:3000"]

[model]
base_url = "https://api.openai.com"
model = "gpt-4"
temperature = 0.7
max_tokens = 2000
request_timeout_secs = 60
# The API key itself is read from this environment variable
api_key_env = "OPENAI_API_KEY"
"#
        .to_string()
    }
}
