use std::path::Path;

use crate::project;

pub async fn run(name: String, force: bool) -> anyhow::Result<()> {
    let root = Path::new(&name);
    let path = project::write_default_layout(root, force)?;
    log::info!("Wrote {}", path.display());
    println!("Created {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set the bench download path under [[interactables]]");
    println!("  2. gallery check {}", path.display());
    println!("  3. gallery walk {}", path.display());
    Ok(())
}
