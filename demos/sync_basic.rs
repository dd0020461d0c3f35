//! Basic synchronous filtering example with the pull API.
//!
//! Run with:
//!     cargo run --example sync_basic

use tokenfilter::StreamFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let template = "Dear ${title} ${lname},\n\
                    your order ${order} ships on ${date}.\n\
                    Tokens we do not know, like ${unknown}, stay as they are.\n";

    let mapping = [
        ("${title}", "Dr."),
        ("${lname}", "Watson"),
        ("${order}", "#221B"),
        ("${date}", "Monday"),
    ];

    let mut filter = StreamFilter::new(template.chars(), mapping)?;
    println!(
        "Filtering {} chars with {} tokens (lookahead {} chars)\n",
        template.chars().count(),
        filter.tokens().len(),
        filter.tokens().max_key_len()
    );

    // Pull the output in small batches
    let mut buf = ['\0'; 16];
    let mut batches = 0;
    let mut output = String::new();
    while let Some(n) = filter.read(&mut buf)? {
        batches += 1;
        output.extend(&buf[..n]);
    }
    filter.close()?;

    print!("{}", output);
    println!("\nTotal: {} chars in {} reads", output.chars().count(), batches);

    println!("\nToken index:\n{}", filter.tokens().index());

    Ok(())
}
