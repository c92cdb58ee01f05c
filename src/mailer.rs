use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Mailer
///
/// Contract for outbound email. All mail the system sends is templated HTML:
/// the contact confirmation and the two newsletter digests. The concrete
/// implementation talks to the mail provider's HTTP API; tests swap in the
/// capturing mock.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &[String], subject: &str, html: &str) -> Result<(), String>;
}

/// Shared handle to the mailer inside the application state.
pub type MailerState = Arc<dyn Mailer>;

/// HttpMailer
///
/// Posts a JSON payload to the provider's send endpoint with a bearer key.
/// Recipients go in BCC-style `to` arrays; the From address comes from
/// configuration.
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: &str, api_key: &str, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &[String], subject: &str, html: &str) -> Result<(), String> {
        if to.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("mail provider returned {}", response.status()));
        }
        Ok(())
    }
}

/// A captured outbound email, for test assertions.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// MockMailer
///
/// Records every send instead of performing it.
#[derive(Default)]
pub struct MockMailer {
    pub should_fail: bool,
    sent: Mutex<Vec<SentEmail>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_mail(&self) -> Vec<SentEmail> {
        self.sent.lock().map(|mail| mail.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &[String], subject: &str, html: &str) -> Result<(), String> {
        if self.should_fail {
            return Err("mock mailer failure".to_string());
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentEmail {
                to: to.to_vec(),
                subject: subject.to_string(),
                html: html.to_string(),
            });
        }
        Ok(())
    }
}

// --- Templates ---

/// An item in the weekly blog digest.
pub struct BlogDigestItem {
    pub title: String,
    pub excerpt: String,
    pub link: String,
    pub publish_date: String,
}

/// An item in the monthly services digest.
pub struct ServiceDigestItem {
    pub title: String,
    pub description: String,
    pub link: String,
}

const MAIL_STYLE: &str = "font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, \
                          sans-serif; background-color: #f5f5f7; color: #1d1d1f; margin: 0; \
                          padding: 0;";
const CARD_STYLE: &str = "max-width: 600px; margin: 40px auto; background-color: #ffffff; \
                          border-radius: 12px; padding: 24px;";

fn wrap_in_layout(heading: &str, inner: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="{MAIL_STYLE}">
  <div style="{CARD_STYLE}">
    <div style="text-align: center; padding-bottom: 24px; border-bottom: 1px solid #e3e3e3;">
      <h1 style="font-size: 28px; font-weight: 600; margin: 0;">{heading}</h1>
    </div>
    <div style="padding: 24px 0;">
      {inner}
    </div>
    <div style="text-align: center; padding-top: 24px; border-top: 1px solid #e3e3e3; color: #888888; font-size: 13px;">
      <p>This email was sent because you contacted us through our website.</p>
    </div>
  </div>
</body>
</html>"#
    )
}

/// Confirmation sent right after a contact-form submission, echoing the
/// visitor's message back to them.
pub fn contact_confirmation_html(message: &str) -> String {
    let inner = format!(
        "<p style=\"font-size: 17px; line-height: 1.6; color: #555555;\">Thank you for reaching \
         out to us. We have received your message and will get back to you as soon as \
         possible.</p><hr style=\"border: 0; height: 1px; background-color: #e3e3e3;\" />\
         <p style=\"font-size: 15px; color: #777777;\">{}</p>",
        html_escape(message)
    );
    wrap_in_layout("Thank you for contacting us", &inner)
}

/// Weekly digest body listing recently published posts.
pub fn weekly_blogs_html(items: &[BlogDigestItem]) -> String {
    let mut inner = String::from(
        "<p style=\"font-size: 17px; color: #555555;\">Here is what we published this week:</p>",
    );
    for item in items {
        inner.push_str(&format!(
            "<div style=\"margin: 16px 0;\"><a href=\"{}\" style=\"font-size: 18px; font-weight: \
             600; color: #0066cc; text-decoration: none;\">{}</a><p style=\"font-size: 15px; \
             color: #666666; margin: 4px 0;\">{}</p><p style=\"font-size: 13px; color: \
             #999999;\">{}</p></div>",
            item.link,
            html_escape(&item.title),
            html_escape(&item.excerpt),
            html_escape(&item.publish_date),
        ));
    }
    wrap_in_layout("New on our blog", &inner)
}

/// Monthly digest body listing services added in the last month.
pub fn monthly_services_html(items: &[ServiceDigestItem]) -> String {
    let mut inner = String::from(
        "<p style=\"font-size: 17px; color: #555555;\">New services we now offer:</p>",
    );
    for item in items {
        inner.push_str(&format!(
            "<div style=\"margin: 16px 0;\"><a href=\"{}\" style=\"font-size: 18px; font-weight: \
             600; color: #0066cc; text-decoration: none;\">{}</a><p style=\"font-size: 15px; \
             color: #666666; margin: 4px 0;\">{}</p></div>",
            item.link,
            html_escape(&item.title),
            html_escape(&item.description),
        ));
    }
    wrap_in_layout("New services this month", &inner)
}

/// Minimal entity escaping for user-provided text embedded in mail bodies.
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_mailer_records_sends() {
        let mailer = MockMailer::new();
        mailer
            .send(&["a@b.co".to_string()], "Hello", "<p>hi</p>")
            .await
            .unwrap();

        let sent = mailer.sent_mail();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Hello");
        assert_eq!(sent[0].to, vec!["a@b.co".to_string()]);
    }

    #[test]
    fn confirmation_escapes_user_message() {
        let html = contact_confirmation_html("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Thank you for contacting us"));
    }

    #[test]
    fn weekly_digest_lists_every_post() {
        let items = vec![
            BlogDigestItem {
                title: "Post A".to_string(),
                excerpt: "First".to_string(),
                link: "https://example.com/blogs/post-a".to_string(),
                publish_date: "2025-08-01".to_string(),
            },
            BlogDigestItem {
                title: "Post B".to_string(),
                excerpt: "Second".to_string(),
                link: "https://example.com/blogs/post-b".to_string(),
                publish_date: "2025-08-03".to_string(),
            },
        ];
        let html = weekly_blogs_html(&items);
        assert!(html.contains("Post A"));
        assert!(html.contains("Post B"));
        assert!(html.contains("https://example.com/blogs/post-b"));
    }

    #[test]
    fn monthly_digest_renders_links() {
        let items = vec![ServiceDigestItem {
            title: "Imaging".to_string(),
            description: "New imaging service".to_string(),
            link: "https://example.com/services/imaging".to_string(),
        }];
        let html = monthly_services_html(&items);
        assert!(html.contains("Imaging"));
        assert!(html.contains("/services/imaging"));
    }
}
