use codestreak_domain::notification::{
    NotificationMessage, NotificationTemplate, ReminderContent, WelcomeContent,
};

pub const PROBLEMSET_URL: &str = "https://leetcode.com/problemset/all/";

const REMINDER_SUBJECT: &str = "⏰ LeetCode Reminder - Keep Your Streak Going!";
const WELCOME_SUBJECT: &str = "🎉 Welcome to LeetCode Reminder!";

const BASE_STYLE: &str = "body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }
      .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; border-radius: 10px; text-align: center; margin-bottom: 30px; }
      .content { background: #f8f9fa; padding: 30px; border-radius: 10px; margin-bottom: 20px; }
      .cta { background: #667eea; color: white; padding: 15px 30px; border-radius: 5px; text-decoration: none; display: inline-block; margin: 20px 0; }
      .footer { text-align: center; color: #666; font-size: 0.9em; margin-top: 30px; }";

const REMINDER_STYLE: &str = ".stats { display: flex; justify-content: space-around; margin: 20px 0; }
      .stat { text-align: center; }
      .stat-number { font-size: 2em; font-weight: bold; color: #667eea; }
      .stat-label { color: #666; font-size: 0.9em; }
      .streak-warning { background: #fff3cd; border: 1px solid #ffeaa7; padding: 15px; border-radius: 5px; margin: 20px 0; }";

/// Provider-independent email body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Render a notification into subject, HTML and plain-text parts
pub fn render(message: &NotificationMessage) -> RenderedEmail {
    match &message.template {
        NotificationTemplate::Reminder(content) => render_reminder(content),
        NotificationTemplate::Welcome(content) => render_welcome(content),
    }
}

fn profile_url(handle: &str) -> String {
    format!("https://leetcode.com/{}/", handle)
}

fn days_phrase(days: u32) -> String {
    if days == 0 {
        return String::new();
    }
    let unit = if days > 1 { "days" } else { "day" };
    format!("It's been {} {} since your last solve.", days, unit)
}

fn render_reminder(content: &ReminderContent) -> RenderedEmail {
    let username = escape_html(&content.username);
    let handle = escape_html(&content.external_handle);
    let time = content.reminder_time.to_string();
    let profile = profile_url(&handle);

    let streak_alert_html = if content.current_streak > 0 {
        format!(
            r#"<div class="streak-warning">
        <strong>⚠️ Streak Alert!</strong> You're on a {}-day streak. {}
      </div>"#,
            content.current_streak,
            days_phrase(content.days_since_last_solve)
        )
    } else {
        String::new()
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>LeetCode Reminder</title>
    <style>
      {base}
      {extra}
    </style>
  </head>
  <body>
    <div class="header">
      <h1>⏰ LeetCode Reminder</h1>
      <p>Time to solve some problems!</p>
    </div>
    <div class="content">
      <h2>Hi {username}! 👋</h2>
      <p>It's {time} and you haven't solved any LeetCode problems today. Don't let your streak break!</p>
      {streak_alert_html}
      <div class="stats">
        <div class="stat">
          <div class="stat-number">{current}</div>
          <div class="stat-label">Current Streak</div>
        </div>
        <div class="stat">
          <div class="stat-number">{longest}</div>
          <div class="stat-label">Longest Streak</div>
        </div>
      </div>
      <p>Ready to keep your coding momentum going? Here are some suggestions:</p>
      <ul>
        <li>🎯 Start with an easy problem to get back in the groove</li>
        <li>📚 Review a problem you solved before</li>
        <li>🔥 Try a new algorithm or data structure</li>
      </ul>
      <div style="text-align: center;">
        <a href="{problemset}" class="cta">Start Solving Now</a>
      </div>
      <p><strong>Your LeetCode Profile:</strong> <a href="{profile}">leetcode.com/{handle}</a></p>
    </div>
    <div class="footer">
      <p>This reminder was sent at {time} because you haven't solved any problems today.</p>
      <p>You can manage your reminder settings in your dashboard.</p>
      <p>Keep coding! 🚀</p>
    </div>
  </body>
</html>"#,
        base = BASE_STYLE,
        extra = REMINDER_STYLE,
        current = content.current_streak,
        longest = content.longest_streak,
        problemset = PROBLEMSET_URL,
    );

    let streak_alert_text = if content.current_streak > 0 {
        format!(
            "STREAK ALERT: You're on a {}-day streak. {}",
            content.current_streak,
            days_phrase(content.days_since_last_solve)
        )
        .trim_end()
        .to_string()
    } else {
        String::new()
    };

    let text = format!(
        "LeetCode Reminder - Keep Your Streak Going!

Hi {username}!

It's {time} and you haven't solved any LeetCode problems today. Don't let your streak break!

{streak_alert_text}

Your Stats:
- Current Streak: {current} days
- Longest Streak: {longest} days

Ready to keep your coding momentum going? Here are some suggestions:
- Start with an easy problem to get back in the groove
- Review a problem you solved before
- Try a new algorithm or data structure

Start solving now: {problemset}

Your LeetCode Profile: {profile}

This reminder was sent at {time} because you haven't solved any problems today.
You can manage your reminder settings in your dashboard.

Keep coding! 🚀",
        username = content.username,
        profile = profile_url(&content.external_handle),
        current = content.current_streak,
        longest = content.longest_streak,
        problemset = PROBLEMSET_URL,
    );

    RenderedEmail {
        subject: REMINDER_SUBJECT.to_string(),
        html,
        text,
    }
}

fn render_welcome(content: &WelcomeContent) -> RenderedEmail {
    let username = escape_html(&content.username);
    let handle = escape_html(&content.external_handle);
    let profile = profile_url(&handle);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Welcome to LeetCode Reminder</title>
    <style>
      {base}
    </style>
  </head>
  <body>
    <div class="header">
      <h1>🎉 Welcome to LeetCode Reminder!</h1>
      <p>Your coding journey just got better</p>
    </div>
    <div class="content">
      <h2>Hi {username}! 👋</h2>
      <p>Great news! Your LeetCode account (<strong>{handle}</strong>) has been successfully connected to our reminder system.</p>
      <h3>What happens next?</h3>
      <ul>
        <li>📊 We'll track your daily coding progress</li>
        <li>⏰ You'll receive reminders when you haven't solved problems</li>
        <li>📈 We'll help you maintain your coding streak</li>
        <li>🎯 You can set multiple reminder times throughout the day</li>
      </ul>
      <div style="text-align: center;">
        <a href="{problemset}" class="cta">Start Your First Problem</a>
      </div>
      <p><strong>Your LeetCode Profile:</strong> <a href="{profile}">leetcode.com/{handle}</a></p>
    </div>
    <div class="footer">
      <p>Happy coding! 🚀</p>
      <p>You can manage your reminder settings anytime in your dashboard.</p>
    </div>
  </body>
</html>"#,
        base = BASE_STYLE,
        problemset = PROBLEMSET_URL,
    );

    let text = format!(
        "Welcome to LeetCode Reminder!

Hi {username}!

Great news! Your LeetCode account ({handle}) has been successfully connected to our reminder system.

What happens next?
- We'll track your daily coding progress
- You'll receive reminders when you haven't solved problems
- We'll help you maintain your coding streak
- You can set multiple reminder times throughout the day

Start your first problem: {problemset}

Your LeetCode Profile: {profile}

Happy coding! 🚀

You can manage your reminder settings anytime in your dashboard.",
        username = content.username,
        handle = content.external_handle,
        profile = profile_url(&content.external_handle),
        problemset = PROBLEMSET_URL,
    );

    RenderedEmail {
        subject: WELCOME_SUBJECT.to_string(),
        html,
        text,
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use codestreak_domain::streak::ReminderTime;

    fn reminder(current: u32, days_since: u32) -> NotificationMessage {
        NotificationMessage::reminder(
            "alice@example.com",
            ReminderContent {
                username: "alice".to_string(),
                external_handle: "alice_lc".to_string(),
                current_streak: current,
                longest_streak: 7,
                last_solved_date: NaiveDate::from_ymd_opt(2024, 3, 9),
                days_since_last_solve: days_since,
                reminder_time: ReminderTime::parse("20:00").unwrap(),
            },
        )
    }

    #[test]
    fn test_reminder_subject_and_links() {
        let email = render(&reminder(3, 1));

        assert_eq!(email.subject, "⏰ LeetCode Reminder - Keep Your Streak Going!");
        assert!(email.html.contains("https://leetcode.com/problemset/all/"));
        assert!(email.html.contains("https://leetcode.com/alice_lc/"));
        assert!(email.text.contains("Your LeetCode Profile: https://leetcode.com/alice_lc/"));
        assert!(email.text.contains("It's 20:00 and you haven't solved"));
    }

    #[test]
    fn test_reminder_streak_alert() {
        let email = render(&reminder(3, 2));
        assert!(email.html.contains("You're on a 3-day streak."));
        assert!(email.text.contains("It's been 2 days since your last solve."));

        let single = render(&reminder(3, 1));
        assert!(single.text.contains("It's been 1 day since your last solve."));

        let no_gap = render(&reminder(3, 0));
        assert!(no_gap.text.contains("STREAK ALERT: You're on a 3-day streak.\n"));
        assert!(!no_gap.text.contains("It's been"));
    }

    #[test]
    fn test_reminder_without_streak_has_no_alert() {
        let email = render(&reminder(0, 4));
        assert!(!email.html.contains("Streak Alert"));
        assert!(!email.text.contains("STREAK ALERT"));
        assert!(email.text.contains("- Current Streak: 0 days"));
        assert!(email.text.contains("- Longest Streak: 7 days"));
    }

    #[test]
    fn test_welcome_email() {
        let email = render(&NotificationMessage::welcome(
            "bob@example.com",
            WelcomeContent {
                username: "bob".to_string(),
                external_handle: "bob_lc".to_string(),
            },
        ));

        assert_eq!(email.subject, "🎉 Welcome to LeetCode Reminder!");
        assert!(email.html.contains("<strong>bob_lc</strong>"));
        assert!(email.text.contains("Your LeetCode account (bob_lc) has been successfully connected"));
    }

    #[test]
    fn test_user_strings_are_escaped_in_html() {
        let email = render(&NotificationMessage::welcome(
            "eve@example.com",
            WelcomeContent {
                username: "<script>eve</script>".to_string(),
                external_handle: "eve".to_string(),
            },
        ));

        assert!(email.html.contains("&lt;script&gt;eve&lt;/script&gt;"));
        assert!(!email.html.contains("<script>"));
    }
}
