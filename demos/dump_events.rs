// ABOUTME: Prints the event stream of a UBJSON document given as hex on the command line.

use ubjson_stream::{read_slice, Context, Result, Sink, StringTag};

struct Printer;

impl Printer {
    fn line(ctx: Context, text: &str) {
        println!("{:>6}  {}{}", ctx.position, "  ".repeat(ctx.depth), text);
    }
}

impl Sink for Printer {
    fn on_null(&mut self, ctx: Context) -> Result<bool> {
        Self::line(ctx, "null");
        Ok(true)
    }
    fn on_bool(&mut self, value: bool, ctx: Context) -> Result<bool> {
        Self::line(ctx, &format!("bool {value}"));
        Ok(true)
    }
    fn on_int(&mut self, value: i64, ctx: Context) -> Result<bool> {
        Self::line(ctx, &format!("int {value}"));
        Ok(true)
    }
    fn on_uint(&mut self, value: u64, ctx: Context) -> Result<bool> {
        Self::line(ctx, &format!("uint {value}"));
        Ok(true)
    }
    fn on_double(&mut self, value: f64, ctx: Context) -> Result<bool> {
        Self::line(ctx, &format!("double {value}"));
        Ok(true)
    }
    fn on_string(&mut self, value: &str, tag: StringTag, ctx: Context) -> Result<bool> {
        Self::line(ctx, &format!("string {value:?} ({tag:?})"));
        Ok(true)
    }
    fn on_key(&mut self, key: &str, ctx: Context) -> Result<bool> {
        Self::line(ctx, &format!("key {key:?}"));
        Ok(true)
    }
    fn on_begin_array(&mut self, count: Option<usize>, ctx: Context) -> Result<bool> {
        match count {
            Some(n) => Self::line(ctx, &format!("array begin (count {n})")),
            None => Self::line(ctx, "array begin"),
        }
        Ok(true)
    }
    fn on_end_array(&mut self, ctx: Context) -> Result<bool> {
        Self::line(ctx, "array end");
        Ok(true)
    }
    fn on_begin_object(&mut self, count: Option<usize>, ctx: Context) -> Result<bool> {
        match count {
            Some(n) => Self::line(ctx, &format!("object begin (count {n})")),
            None => Self::line(ctx, "object begin"),
        }
        Ok(true)
    }
    fn on_end_object(&mut self, ctx: Context) -> Result<bool> {
        Self::line(ctx, "object end");
        Ok(true)
    }
}

fn main() {
    // {"nums": [$U#i3 1 2 3], "pi": H"3.14159"}
    const SAMPLE: &str = "7b 69 04 6e 75 6d 73 5b 24 55 23 69 03 01 02 03 \
                          69 02 70 69 48 69 07 33 2e 31 34 31 35 39 7d";

    let arg = std::env::args().nth(1);
    let hex = arg.as_deref().unwrap_or(SAMPLE);
    let cleaned: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() % 2 != 0 || !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        eprintln!("usage: dump_events [hex bytes]");
        std::process::exit(2);
    }
    let data: Vec<u8> = (0..cleaned.len())
        .step_by(2)
        .filter_map(|i| u8::from_str_radix(&cleaned[i..i + 2], 16).ok())
        .collect();

    if let Err(err) = read_slice(&data, &mut Printer) {
        eprintln!("decode error: {err} (code {})", err.code());
        std::process::exit(1);
    }
}
