//! Render meta tags as `<head>` HTML.

use crate::meta::MetaTags;

/// Render `meta` as the tags of a page `<head>`, one per line.
///
/// Attribute values and the title are HTML-escaped. The JSON-LD block is
/// emitted verbatim except that `</` is escaped so it cannot close the script.
pub fn render_head(meta: &MetaTags, site_name: &str) -> String {
    let mut tags = vec![
        format!("<title>{}</title>", escape_html(&meta.title)),
        meta_name("description", &meta.description),
        meta_name("robots", &meta.robots),
        format!(r#"<link rel="canonical" href="{}" />"#, escape_html(&meta.canonical)),
    ];

    tags.extend(meta.hreflang.iter().map(|link| {
        format!(
            r#"<link rel="alternate" hreflang="{}" href="{}" />"#,
            escape_html(&link.lang),
            escape_html(&link.url)
        )
    }));

    let og = &meta.open_graph;
    tags.push(meta_property("og:type", &og.og_type));
    tags.push(meta_property("og:title", &og.title));
    tags.push(meta_property("og:description", &og.description));
    tags.push(meta_property("og:image", &og.image));
    tags.push(meta_property("og:url", &og.url));
    tags.push(meta_property("og:locale", &og.locale));
    tags.extend(
        og.alternate_locales
            .iter()
            .map(|locale| meta_property("og:locale:alternate", locale)),
    );
    tags.push(meta_property("og:site_name", site_name));

    let twitter = &meta.twitter;
    tags.push(meta_name("twitter:card", &twitter.card));
    tags.push(meta_name("twitter:title", &twitter.title));
    tags.push(meta_name("twitter:description", &twitter.description));
    tags.push(meta_name("twitter:image", &twitter.image));

    if !meta.schema.is_null() {
        tags.push(format!(
            r#"<script type="application/ld+json">{}</script>"#,
            meta.schema.to_string().replace("</", "<\\/")
        ));
    }

    let mut html = tags.join("\n");
    html.push('\n');
    html
}

fn meta_name(name: &str, content: &str) -> String {
    format!(r#"<meta name="{name}" content="{}" />"#, escape_html(content))
}

fn meta_property(property: &str, content: &str) -> String {
    format!(r#"<meta property="{property}" content="{}" />"#, escape_html(content))
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        links::HreflangLink,
        meta::{OpenGraph, TwitterCard},
    };

    fn meta() -> MetaTags {
        MetaTags {
            title: "Q&A | Seasalt.AI".to_string(),
            description: "Say \"hi\"".to_string(),
            canonical: "https://seasalt.ai/blog/qa".to_string(),
            hreflang: vec![
                HreflangLink {
                    lang: "en".to_string(),
                    url: "https://seasalt.ai/blog/qa".to_string(),
                },
                HreflangLink {
                    lang: "x-default".to_string(),
                    url: "https://seasalt.ai/blog/qa".to_string(),
                },
            ],
            open_graph: OpenGraph {
                og_type: "article".to_string(),
                title: "Q&A".to_string(),
                description: "Say \"hi\"".to_string(),
                image: "https://seasalt.ai/og-image.jpg".to_string(),
                url: "https://seasalt.ai/blog/qa".to_string(),
                locale: "en_US".to_string(),
                alternate_locales: vec!["zh_CN".to_string(), "ja_JP".to_string()],
            },
            twitter: TwitterCard {
                card: "summary".to_string(),
                title: "Q&A".to_string(),
                description: "Say \"hi\"".to_string(),
                image: "https://seasalt.ai/og-image.jpg".to_string(),
            },
            schema: json!({"@type": "BlogPosting", "headline": "</script><b>"}),
            robots: "index, follow".to_string(),
        }
    }

    #[test]
    fn test_render_head() {
        let html = render_head(&meta(), "Seasalt.AI");

        assert!(html.contains("<title>Q&amp;A | Seasalt.AI</title>"));
        assert!(html.contains(r#"<meta name="description" content="Say &quot;hi&quot;" />"#));
        assert!(html.contains(r#"<meta name="robots" content="index, follow" />"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://seasalt.ai/blog/qa" />"#));
        assert!(html.contains(r#"hreflang="x-default""#));
        assert!(html.contains(r#"<meta property="og:type" content="article" />"#));
        assert!(html.contains(r#"<meta property="og:site_name" content="Seasalt.AI" />"#));
        assert_eq!(html.matches("og:locale:alternate").count(), 2);
        assert!(html.contains(r#"<meta name="twitter:card" content="summary" />"#));
    }

    #[test]
    fn test_json_ld_cannot_close_script() {
        let html = render_head(&meta(), "Seasalt.AI");
        assert!(html.contains(r#"<script type="application/ld+json">"#));
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains(r"<\/script><b>"));
    }
}
