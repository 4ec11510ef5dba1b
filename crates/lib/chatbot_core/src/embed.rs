//! Embeddable chat widget snippet.

/// Build the `<iframe>` fragment that embeds the chat widget served at
/// `{website_url}/chatbot`.
///
/// The URL is not validated or normalized: `/chatbot` is appended to it as
/// given, so `https://a.test/` yields `https://a.test//chatbot`. It is only
/// escaped for use inside a double-quoted HTML attribute.
pub fn embed_code(website_url: &str) -> String {
    let src = escape_attr(website_url);
    format!(
        r#"
    <iframe
        src="{src}/chatbot"
        width="400"
        height="600"
        style="position: fixed; bottom: 20px; right: 20px; border: none; border-radius: 10px; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);"
    ></iframe>
    "#
    )
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
