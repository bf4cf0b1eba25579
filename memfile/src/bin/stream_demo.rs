//! Stream CLI Demo
//!
//! Reads lines from stdin and writes them into one in-memory file through
//! several streams at once: a positional stream on the main thread and
//! append streams on worker threads. Then reads the file back.
//!
//! Set `RUST_LOG=debug` to see streams open and close.

use memfile::File;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

const APPENDERS: usize = 3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let file = Arc::new(File::new());

    println!("Enter text (empty line to quit):");
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        lines.push(trimmed.to_string());
    }

    // Header goes through a positional stream before anyone appends
    let header = file.new_output_stream(false);
    header.write_buf(format!("{} lines\n", lines.len()).as_bytes())?;
    header.close();

    thread::scope(|s| {
        for worker in 0..APPENDERS {
            let out = file.new_output_stream(true);
            let lines = &lines;
            s.spawn(move || {
                for line in lines.iter().skip(worker).step_by(APPENDERS) {
                    let record = format!("[w{worker}] {line}\n");
                    if let Err(e) = out.write_buf(record.as_bytes()) {
                        eprintln!("Write error: {e}");
                        break;
                    }
                }
                out.close();
            });
        }
    });

    let input = file.new_input_stream();
    let mut buf = [0u8; 16];
    let mut content = Vec::new();
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        content.extend_from_slice(&buf[..n]);
    }
    input.close();

    print!("{}", String::from_utf8_lossy(&content));
    println!(
        "size={} modified={:?}",
        file.size(),
        file.last_modified_time()
    );
    Ok(())
}
