//! Showcasing scratch file operations.

use fs_scratch::ScratchFile;

fn main() -> fs_scratch::Result<()> {
    // Creating a scratch file in the platform temporary directory
    let mut file = ScratchFile::new()?;
    println!("working at {:?}", file.path()?);

    // Content can be replaced, appended and read back
    file.put("HOGE")?;
    file.append("FUGA")?;
    println!("content: {}", String::from_utf8_lossy(&file.contents()?));

    // Writes go to the current position without truncating what follows
    file.rewind()?;
    file.write("PIYO")?;
    println!("content: {}", String::from_utf8_lossy(&file.contents()?));

    // Closing removes the backing file
    let path = file.path()?.to_path_buf();
    file.close();
    assert!(!path.exists());

    Ok(())
}
