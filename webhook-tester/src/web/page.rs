//! Informational landing page served on `GET /` without handshake parameters.

use url::form_urlencoded;

use crate::Config;

/// Example query string a caller can use to exercise the handshake.
pub fn example_verification_query(config: &Config) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("hub.mode", "subscribe")
        .append_pair("hub.challenge", "123456789")
        .append_pair("hub.verify_token", &config.verify_token)
        .finish()
}

/// Render the landing page for the given configuration.
///
/// Port and verify token are shown verbatim.
pub fn render_info_page(config: &Config) -> String {
    let port = config.port;
    let token = &config.verify_token;
    let query = example_verification_query(config);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>WhatsApp Webhook Tester</title>
  <style>
    body {{ font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }}
    .container {{ background: #f5f5f5; padding: 20px; border-radius: 8px; }}
    code {{ background: #eee; padding: 2px 4px; border-radius: 4px; }}
    .success {{ color: green; }}
    .error {{ color: red; }}
  </style>
</head>
<body>
  <div class="container">
    <h1>WhatsApp Webhook Tester</h1>
    <p><strong>Status:</strong> <span class="success">✅ Running</span></p>
    <p><strong>Port:</strong> {port}</p>
    <p><strong>Verify Token:</strong> {token}</p>

    <h2>Endpoints:</h2>
    <ul>
      <li><code>GET /</code> - This page / Webhook verification</li>
      <li><code>POST /</code> - Webhook events from WhatsApp</li>
      <li><code>GET /health</code> - Health check</li>
    </ul>

    <h2>To Test Webhook Verification:</h2>
    <p>Send a GET request with these query parameters:</p>
    <code>?{query}</code>

    <h2>Test with curl:</h2>
    <pre>
curl "http://localhost:{port}/?{query}"
    </pre>

    <h2>Test with Meta Developer Portal:</h2>
    <ol>
      <li>Go to Meta App Dashboard → WhatsApp → Configuration → Webhooks</li>
      <li>Callback URL: <code>https://YOUR_PUBLIC_URL</code></li>
      <li>Verify Token: <code>{token}</code></li>
      <li>Click "Verify and save"</li>
    </ol>

    <h2>View Logs:</h2>
    <p>Webhook events will appear in the terminal where you ran <code>webhook-tester</code></p>
  </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_shows_port_and_token() {
        let config = Config {
            port: 4242,
            verify_token: "my-token".to_string(),
        };
        let html = render_info_page(&config);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<strong>Port:</strong> 4242"));
        assert!(html.contains("<strong>Verify Token:</strong> my-token"));
        assert!(html.contains("curl \"http://localhost:4242/?hub.mode=subscribe"));
    }

    #[test]
    fn test_example_query_is_encoded() {
        let config = Config {
            port: 3000,
            verify_token: "a&b c".to_string(),
        };
        assert_eq!(
            example_verification_query(&config),
            "hub.mode=subscribe&hub.challenge=123456789&hub.verify_token=a%26b+c"
        );
    }

    #[test]
    fn test_default_example_query() {
        assert_eq!(
            example_verification_query(&Config::default()),
            "hub.mode=subscribe&hub.challenge=123456789&hub.verify_token=vibecode"
        );
    }
}
