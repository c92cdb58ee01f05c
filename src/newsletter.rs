use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};

use crate::AppState;
use crate::mailer::{BlogDigestItem, ServiceDigestItem, monthly_services_html, weekly_blogs_html};

/// Newsletter scheduler.
///
/// Two digests go to every email address that ever used the contact form:
/// blogs published in the last week (Tuesday 11:00 UTC) and services added in
/// the last month (1st of the month, 10:00 UTC). A digest with no recipients
/// or no content is skipped silently.

const WEEKLY_HOUR: u32 = 11;
const MONTHLY_HOUR: u32 = 10;

/// Next Tuesday 11:00 UTC strictly after `after`.
pub fn next_weekly(after: DateTime<Utc>) -> DateTime<Utc> {
    let mut candidate = after
        .date_naive()
        .and_hms_opt(WEEKLY_HOUR, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(after);
    while candidate.weekday() != Weekday::Tue || candidate <= after {
        candidate += Duration::days(1);
    }
    candidate
}

/// Next 1st-of-month 10:00 UTC strictly after `after`.
pub fn next_monthly(after: DateTime<Utc>) -> DateTime<Utc> {
    let mut year = after.year();
    let mut month = after.month();

    loop {
        if let Some(candidate) = Utc
            .with_ymd_and_hms(year, month, 1, MONTHLY_HOUR, 0, 0)
            .single()
        {
            if candidate > after {
                return candidate;
            }
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
}

/// Spawns the two digest loops. Each sleeps until its next occurrence, runs,
/// and reschedules; errors are logged and never kill the loop.
pub fn spawn_digest_scheduler(state: AppState) {
    let weekly_state = state.clone();
    tokio::spawn(async move {
        loop {
            let next = next_weekly(Utc::now());
            tracing::info!(at = %next, "weekly blog digest scheduled");
            sleep_until(next).await;
            if let Err(err) = send_weekly_blog_digest(&weekly_state).await {
                tracing::error!(error = err, "weekly blog digest failed");
            }
        }
    });

    tokio::spawn(async move {
        loop {
            let next = next_monthly(Utc::now());
            tracing::info!(at = %next, "monthly services digest scheduled");
            sleep_until(next).await;
            if let Err(err) = send_monthly_services_digest(&state).await {
                tracing::error!(error = err, "monthly services digest failed");
            }
        }
    });
}

async fn sleep_until(instant: DateTime<Utc>) {
    let now = Utc::now();
    if let Ok(wait) = (instant - now).to_std() {
        tokio::time::sleep(wait).await;
    }
}

/// Assembles and sends the weekly digest: posts published in the last seven
/// days, linked at `{site_url}/blogs/{slug}`.
pub async fn send_weekly_blog_digest(state: &AppState) -> Result<(), String> {
    let emails = state.repo.contact_emails().await.map_err(|e| e.to_string())?;
    let since = Utc::now() - Duration::days(7);
    let blogs = state
        .repo
        .recent_published_blogs(since)
        .await
        .map_err(|e| e.to_string())?;

    if emails.is_empty() || blogs.is_empty() {
        tracing::info!(
            recipients = emails.len(),
            posts = blogs.len(),
            "skipping weekly digest"
        );
        return Ok(());
    }

    let items: Vec<BlogDigestItem> = blogs
        .iter()
        .map(|post| BlogDigestItem {
            title: post.title.clone(),
            excerpt: post.excerpt.clone().unwrap_or_default(),
            link: format!("{}/blogs/{}", state.config.site_url, post.slug),
            publish_date: post
                .published_at
                .unwrap_or(post.created_at)
                .format("%Y-%m-%d")
                .to_string(),
        })
        .collect();

    state
        .mailer
        .send(&emails, "New on our blog this week", &weekly_blogs_html(&items))
        .await?;
    tracing::info!(recipients = emails.len(), posts = items.len(), "weekly digest sent");
    Ok(())
}

/// Assembles and sends the monthly digest: services created in the last
/// thirty days, linked at `{site_url}/services/{slug}`.
pub async fn send_monthly_services_digest(state: &AppState) -> Result<(), String> {
    let emails = state.repo.contact_emails().await.map_err(|e| e.to_string())?;
    let since = Utc::now() - Duration::days(30);
    let services = state
        .repo
        .recent_services(since)
        .await
        .map_err(|e| e.to_string())?;

    if emails.is_empty() || services.is_empty() {
        tracing::info!(
            recipients = emails.len(),
            services = services.len(),
            "skipping monthly digest"
        );
        return Ok(());
    }

    let items: Vec<ServiceDigestItem> = services
        .iter()
        .map(|service| ServiceDigestItem {
            title: service.title.clone(),
            description: service.excerpt.clone().unwrap_or_default(),
            link: format!("{}/services/{}", state.config.site_url, service.slug),
        })
        .collect();

    state
        .mailer
        .send(
            &emails,
            "New services this month",
            &monthly_services_html(&items),
        )
        .await?;
    tracing::info!(
        recipients = emails.len(),
        services = items.len(),
        "monthly digest sent"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap()
    }

    #[test]
    fn weekly_lands_on_tuesday_eleven_utc() {
        // 2025-08-06 is a Wednesday; next Tuesday is the 12th.
        let next = next_weekly(utc(2025, 8, 6, 9, 0));
        assert_eq!(next, utc(2025, 8, 12, WEEKLY_HOUR, 0));
        assert_eq!(next.weekday(), Weekday::Tue);
    }

    #[test]
    fn weekly_same_day_before_the_hour_fires_today() {
        // 2025-08-05 is a Tuesday; 09:00 is before the send hour.
        let next = next_weekly(utc(2025, 8, 5, 9, 0));
        assert_eq!(next, utc(2025, 8, 5, WEEKLY_HOUR, 0));
    }

    #[test]
    fn weekly_same_day_after_the_hour_rolls_a_week() {
        let next = next_weekly(utc(2025, 8, 5, 12, 0));
        assert_eq!(next, utc(2025, 8, 12, WEEKLY_HOUR, 0));
    }

    #[test]
    fn monthly_rolls_to_next_month() {
        let next = next_monthly(utc(2025, 8, 6, 9, 0));
        assert_eq!(next, utc(2025, 9, 1, MONTHLY_HOUR, 0));
    }

    #[test]
    fn monthly_on_the_first_before_the_hour_fires_today() {
        let next = next_monthly(utc(2025, 8, 1, 8, 0));
        assert_eq!(next, utc(2025, 8, 1, MONTHLY_HOUR, 0));
    }

    #[test]
    fn monthly_crosses_year_boundary() {
        let next = next_monthly(utc(2025, 12, 15, 0, 0));
        assert_eq!(next, utc(2026, 1, 1, MONTHLY_HOUR, 0));
    }

    #[test]
    fn schedule_is_strictly_in_the_future() {
        let at = utc(2025, 8, 5, WEEKLY_HOUR, 0);
        assert!(next_weekly(at) > at);
        let first = utc(2025, 8, 1, MONTHLY_HOUR, 0);
        assert!(next_monthly(first) > first);
    }
}
