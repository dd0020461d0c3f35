//! Async filtering with concurrent streams example.
//!
//! Demonstrates one `Replacer` shared by several async filtering streams
//! running concurrently on tokio.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io

use futures_util::StreamExt;
use tokenfilter::{Replacer, filter_async};
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let replacer = Replacer::new([("${service}", "billing"), ("${port}", "8080")])?;

    // Create multiple in-memory templates
    let templates: Vec<String> = (0..3)
        .map(|i| format!("[{}] ${{service}} listening on :${{port}}\n", i).repeat(1000))
        .collect();

    println!("Processing {} streams concurrently...\n", templates.len());

    let handles: Vec<_> = templates
        .into_iter()
        .enumerate()
        .map(|(stream_id, template)| {
            let replacer = replacer.clone();
            tokio::spawn(async move { process_stream(stream_id, template, replacer).await })
        })
        .collect();

    for handle in handles {
        let (stream_id, items, total_chars) = handle.await??;
        println!(
            "Stream {}: {} items, {} chars",
            stream_id, items, total_chars
        );
    }

    Ok(())
}

async fn process_stream(
    stream_id: usize,
    template: String,
    replacer: Replacer,
) -> Result<(usize, usize, usize), tokenfilter::FilterError> {
    let (mut writer, reader) = tokio::io::duplex(4096);

    // Feed the template from a separate task
    tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        let _ = writer.write_all(template.as_bytes()).await;
    });

    let mut stream = filter_async(reader.compat(), &replacer)?;
    let mut items = 0;
    let mut total_chars = 0;

    while let Some(text) = stream.next().await {
        items += 1;
        total_chars += text?.chars().count();
    }

    Ok((stream_id, items, total_chars))
}
