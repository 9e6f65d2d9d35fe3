use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    diffbind::build!("declarations.json");

    Ok(())
}
