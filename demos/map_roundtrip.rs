#[cfg(feature = "std")]
fn main() {
    use maplevel::qmap::{self, CheckWritable, Writes};
    use std::env::args;
    use std::io;

    let mut arguments = args();
    arguments.next();

    let inpath = if let Some(path) = arguments.next() {
        path
    } else {
        panic!("No input path");
    };

    let outpath = if let Some(path) = arguments.next() {
        path
    } else {
        panic!("No output path");
    };

    let infile = std::fs::File::open(inpath).unwrap();
    let level = match qmap::parse(infile) {
        Ok(level) => level,
        Err(err) => panic!("{}", err),
    };

    if let Err(msg) = level.check_writable() {
        panic!("Level cannot be written back: {}", msg);
    }

    let outfile = std::fs::File::create(outpath).unwrap();
    let mut writer = io::BufWriter::new(outfile);
    level.write_to(&mut writer).unwrap();
}

#[cfg(not(feature = "std"))]
fn main() {}
