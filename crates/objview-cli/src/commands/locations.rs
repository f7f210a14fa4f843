use anyhow::Result;

use objview_core::host::JsonLinesSink;
use objview_core::{AppConfig, HostMessage, HostSink, Listing};

use super::source::SourceArgs;

pub async fn run(config: &AppConfig, source: &SourceArgs) -> Result<()> {
    let listing = source.load(config).await?;
    let mut sink = JsonLinesSink::new(std::io::stdout().lock());
    let posted = post_locations(&listing, &mut sink)?;
    tracing::info!("Printed {} locations", posted);
    Ok(())
}

/// Post the message each row would send when selected
fn post_locations(listing: &Listing, sink: &mut dyn HostSink) -> objview_core::Result<usize> {
    let mut count = 0;
    for (_, location) in listing.locations() {
        sink.post(&HostMessage::open_document(location))?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_per_located_row() {
        let listing = Listing::parse("header\na.c:1\n  0:\tnop\n  1:\tnop\nb.c:9\n  2:\tret");
        let mut sink = JsonLinesSink::new(Vec::new());
        let count = post_locations(&listing, &mut sink).unwrap();
        assert_eq!(count, 3);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"type":"openDocument","file":"a.c","line":1}"#);
        assert_eq!(lines[2], r#"{"type":"openDocument","file":"b.c","line":9}"#);
    }
}
