use crate::gallery::Site;
use crate::session::Session;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0 auto; max-width: 1200px; padding: 1.5rem; color: #262730; }
h1 { margin-bottom: .25rem; }
textarea { width: 100%; height: 200px; font: inherit; padding: .5rem; box-sizing: border-box; }
input[type=text] { width: 100%; max-width: 480px; padding: .4rem; font: inherit; }
button { font: inherit; padding: .4rem .9rem; margin: .4rem .4rem .4rem 0; border-radius: .4rem; border: 1px solid #d0d0d8; background: #fff; cursor: pointer; }
button.primary { background: #ff4b4b; border-color: #ff4b4b; color: #fff; }
iframe { width: 100%; height: 600px; border: 1px solid #e0e0e6; }
pre.explanation { white-space: pre-wrap; background: #f6f6f9; padding: 1rem; border-radius: .4rem; overflow-x: auto; }
.notice { padding: .75rem 1rem; border-radius: .4rem; margin: 1rem 0; }
.notice.error { background: #ffecec; color: #7d1a1a; }
.notice.success { background: #e8f8ee; color: #175c2e; }
.gallery form { display: inline; }
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

/// Everything one render of the page needs.
pub struct PageView<'a> {
    pub session: &'a Session,
    pub notice: Option<&'a Notice>,
    pub draft: &'a str,
    pub gallery_enabled: bool,
    pub sites: &'a [Site],
    pub replay: Option<&'a Site>,
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn preview(out: &mut String, code: &str) {
    out.push_str(&format!(
        r#"<iframe sandbox="allow-scripts" scrolling="yes" srcdoc="{}"></iframe>"#,
        escape(code)
    ));
}

pub fn render(view: &PageView<'_>) -> String {
    let session = view.session;
    let mut out = String::new();

    out.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Site Generator</title>
<style>{STYLE}</style>
</head>
<body>
<h1>Interactive Website Generator</h1>
<p>Enter your desired website and let the AI generate it for you!</p>
"#
    ));

    match view.notice {
        Some(Notice::Error(message)) => {
            out.push_str(&format!(r#"<div class="notice error">{}</div>"#, escape(message)));
        }
        Some(Notice::Success(message)) => {
            out.push_str(&format!(r#"<div class="notice success">{}</div>"#, escape(message)));
        }
        None => {}
    }

    out.push_str(&format!(
        r#"<form method="post" action="/generate">
<label for="prompt">Type your content:</label>
<textarea id="prompt" name="prompt">{}</textarea>
"#,
        escape(view.draft)
    ));
    if session.has_generated() {
        out.push_str(r#"<p><label><input type="checkbox" name="reset" value="on"> Reset</label></p>"#);
    }
    out.push_str(&format!(
        r#"<button class="primary" type="submit">{}</button>
</form>
"#,
        session.action_label()
    ));

    if let Some(artifact) = session.artifact() {
        out.push_str("<h2>Generated website</h2>\n");
        preview(&mut out, &artifact.code);

        out.push_str(&format!(
            r#"<form method="post" action="/code"><button type="submit">{}</button></form>
"#,
            session.explanation_label()
        ));
        if session.show_explanation {
            out.push_str(&format!(
                r#"<h2>Code and explanations</h2>
<pre class="explanation">{}</pre>
"#,
                escape(&artifact.explanation)
            ));
        }

        if view.gallery_enabled {
            out.push_str(
                r#"<h2>Publish website</h2>
<p>If you publish the website and it is approved it will be displayed below for everyone to try out.
By submitting you give full permission to do so.</p>
<form method="post" action="/submit">
<label for="name">Add a name for the website</label><br>
<input type="text" id="name" name="name">
<button type="submit">Submit</button>
</form>
"#,
            );
        }
    }

    if view.gallery_enabled && !view.sites.is_empty() {
        out.push_str("<h2>Try previously generated websites</h2>\n<div class=\"gallery\">\n");
        for site in view.sites {
            out.push_str(&format!(
                "<form method=\"post\" action=\"/gallery/{}\"><button type=\"submit\">{}</button></form>\n",
                site.id,
                escape(&site.name)
            ));
        }
        out.push_str("</div>\n");
    }

    if let Some(site) = view.replay {
        out.push_str(&format!("<h3>{}</h3>\n", escape(&site.name)));
        preview(&mut out, &site.code);
    }

    out.push_str("\n</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn view<'a>(session: &'a Session, sites: &'a [Site], gallery_enabled: bool) -> PageView<'a> {
        PageView {
            session,
            notice: None,
            draft: "",
            gallery_enabled,
            sites,
            replay: None,
        }
    }

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn fresh_session_offers_generation_only() {
        let session = Session::new();
        let html = render(&view(&session, &[], true));

        assert!(html.contains("Generate website"));
        assert!(!html.contains("Reset"));
        assert!(!html.contains("<iframe"));
        assert!(!html.contains("Publish website"));
    }

    #[test]
    fn gallery_listing_hidden_when_disabled() {
        let session = Session::new();
        let sites = vec![Site {
            id: Uuid::new_v4(),
            name: "Zoo <3".to_string(),
            code: "<p>zoo</p>".to_string(),
            accepted: true,
            views: 4,
            created_at: Utc::now(),
        }];

        let enabled = render(&view(&session, &sites, true));
        assert!(enabled.contains("Try previously generated websites"));
        assert!(enabled.contains("Zoo &lt;3"));
        assert!(enabled.contains(&format!("/gallery/{}", sites[0].id)));

        let disabled = render(&view(&session, &sites, false));
        assert!(!disabled.contains("Try previously generated websites"));
    }

    #[test]
    fn notices_and_draft_are_escaped() {
        let session = Session::new();
        let notice = Notice::Error("bad <input>".to_string());
        let page = PageView {
            notice: Some(&notice),
            draft: "</textarea><script>",
            ..view(&session, &[], false)
        };

        let html = render(&page);
        assert!(html.contains(r#"<div class="notice error">bad &lt;input&gt;</div>"#));
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;"));
    }

    #[tokio::test]
    async fn generated_page_renders_every_section() {
        let provider = crate::providers::testing::ScriptedProvider::new(vec![Ok(
            "Plain page:\n```html\n<p>hi</p>\n```",
        )]);
        let mut session = Session::new();
        session.generate(&provider, "hi", false).await.unwrap();
        session.toggle_explanation();
        let sites = vec![Site {
            id: Uuid::new_v4(),
            name: "Zoo".to_string(),
            code: "<p>zoo</p>".to_string(),
            accepted: true,
            views: 0,
            created_at: Utc::now(),
        }];
        let page = PageView {
            replay: Some(&sites[0]),
            ..view(&session, &sites, true)
        };

        let html = render(&page);

        assert!(html.contains(r#"srcdoc="&lt;p&gt;hi&lt;/p&gt;"></iframe>"#));
        assert!(html.contains("<pre class=\"explanation\">Plain page:"));
        assert!(html.contains(r#"<input type="text" id="name" name="name">"#));
        assert!(html.contains(&format!(
            "<form method=\"post\" action=\"/gallery/{}\"><button type=\"submit\">Zoo</button></form>\n",
            sites[0].id
        )));
        assert!(html.contains("<h3>Zoo</h3>\n<iframe"));
        assert!(html.ends_with("</body>\n</html>\n"));
    }
}
