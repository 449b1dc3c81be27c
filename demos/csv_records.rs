//! Showcasing CSV record reading from a scratch file.

use fs_scratch::csv::Dialect;
use fs_scratch::ScratchFile;

fn main() -> fs_scratch::Result<()> {
    let mut file = ScratchFile::new()?;
    file.put("id,name\n1,\"Doe, John\"\n2,\"Roe, Jane\"\n")?;
    file.rewind()?;

    // Records come back one at a time, `None` marks exhaustion
    while let Some(record) = file.read_record()? {
        println!("{:?}", record);
    }

    // Other separator conventions are a dialect away
    file.put("1|'a|b'\n")?;
    file.rewind()?;
    let record = file.read_record_with(&Dialect::new(b'|', b'\'', b'\\'))?;
    println!("{:?}", record);

    Ok(())
}
