//! RSS 2.0 rendering of entry listings.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::entry::Entry;
use crate::{FeedlistError, Result};

/// Content type of the RSS export.
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Channel-level fields of an RSS document.
#[derive(Debug, Clone)]
pub struct RssChannel<'a> {
    /// Channel title.
    pub title: &'a str,
    /// Channel description.
    pub description: &'a str,
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| FeedlistError::Render(e.to_string()))
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write_item(writer: &mut XmlWriter, entry: &Entry) -> Result<()> {
    write(writer, Event::Start(BytesStart::new("item")))?;

    write_text_element(writer, "title", &entry.title)?;
    if let Some(link) = &entry.link {
        write_text_element(writer, "link", link)?;
    }

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    write(writer, Event::Start(guid))?;
    write(writer, Event::Text(BytesText::new(&entry.guid)))?;
    write(writer, Event::End(BytesEnd::new("guid")))?;

    if let Some(author) = &entry.author {
        write_text_element(writer, "dc:creator", author)?;
    }
    write_text_element(writer, "category", &entry.feed_title)?;
    write_text_element(writer, "description", &entry.content)?;
    if let Some(published_at) = entry.published_at {
        write_text_element(writer, "pubDate", &published_at.to_rfc2822())?;
    }

    write(writer, Event::End(BytesEnd::new("item")))
}

/// Render entries as an RSS 2.0 document, in the given order.
pub fn render_rss(channel: &RssChannel<'_>, entries: &[Entry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"));
    write(&mut writer, Event::Start(rss))?;
    write(&mut writer, Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", channel.title)?;
    write_text_element(&mut writer, "description", channel.description)?;

    for entry in entries {
        write_item(&mut writer, entry)?;
    }

    write(&mut writer, Event::End(BytesEnd::new("channel")))?;
    write(&mut writer, Event::End(BytesEnd::new("rss")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| FeedlistError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(id: i64, title: &str) -> Entry {
        Entry {
            id,
            feed_id: 1,
            feed_title: "Rust Blog".to_string(),
            guid: format!("urn:entry:{id}"),
            title: title.to_string(),
            author: Some("The Rust Team".to_string()),
            link: Some(format!("https://blog.example/{id}")),
            content: "<p>Hello & welcome</p>".to_string(),
            published_at: Some(Utc.with_ymd_and_hms(2024, 7, 25, 12, 0, 0).unwrap()),
            is_read: false,
            is_favorite: false,
        }
    }

    #[test]
    fn test_render_channel_and_items() {
        let channel = RssChannel {
            title: "Main stream | feedlist",
            description: "A self-hosted feed reader",
        };
        let xml = render_rss(&channel, &[entry(2, "Second"), entry(1, "First")]).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\""));
        assert!(xml.contains("<title>Main stream | feedlist</title>"));
        assert!(xml.contains("<guid isPermaLink=\"false\">urn:entry:2</guid>"));
        assert!(xml.contains("<dc:creator>The Rust Team</dc:creator>"));
        assert!(xml.contains("<pubDate>Thu, 25 Jul 2024 12:00:00 +0000</pubDate>"));
        assert!(xml.find("Second").unwrap() < xml.find("First").unwrap());
    }

    #[test]
    fn test_render_escapes_markup() {
        let channel = RssChannel {
            title: "A < B",
            description: "",
        };
        let xml = render_rss(&channel, &[entry(1, "x")]).unwrap();

        assert!(xml.contains("<title>A &lt; B</title>"));
        assert!(xml.contains("&lt;p&gt;Hello &amp; welcome&lt;/p&gt;"));
    }

    #[test]
    fn test_render_empty_listing() {
        let channel = RssChannel {
            title: "Empty",
            description: "nothing",
        };
        let xml = render_rss(&channel, &[]).unwrap();
        assert!(!xml.contains("<item>"));
        assert!(xml.contains("</channel>"));
    }
}
