use std::path::PathBuf;

use gallery_shared::scene::GalleryScene;

use crate::project::{self, LayoutSource};

pub async fn run(layout_path: PathBuf) -> anyhow::Result<()> {
    let (layout, source) = project::resolve_layout(Some(&layout_path))?;
    let scene = GalleryScene::from_layout(&layout);

    println!("{} is valid.", source.label());
    println!();
    println!(
        "Intro: {:.1}s dolly from z={:.2} to z={:.2} (clearance z={:.2})",
        layout.intro.duration,
        layout.intro.start_z,
        layout.intro_end_z(),
        layout.intro_min_z(),
    );
    println!("Collidables ({}):", scene.collidables().len());
    for c in scene.collidables() {
        println!(
            "  {:<20} min {:>6.2} {:>6.2} {:>6.2}  max {:>6.2} {:>6.2} {:>6.2}",
            c.name, c.bounds.min.x, c.bounds.min.y, c.bounds.min.z, c.bounds.max.x,
            c.bounds.max.y, c.bounds.max.z,
        );
    }
    println!("Interactables ({}):", scene.interactables().len());
    for i in scene.interactables() {
        println!("  {:<20} {:?}", i.name, i.action);
    }
    println!("Assets ({}):", scene.assets.len());
    for a in scene.assets.iter() {
        println!("  {:<20} {:<16} {}", a.id, a.kind.label(), a.url);
    }

    for warning in warnings(&layout, &source) {
        println!("warning: {warning}");
    }
    Ok(())
}

/// Problems that do not make the layout invalid but are worth fixing.
pub fn warnings(layout: &gallery_shared::GalleryLayout, source: &LayoutSource) -> Vec<String> {
    let mut out = Vec::new();
    if layout.has_placeholder_downloads() {
        out.push(format!(
            "a download still points at {}; visitors will see a notice instead",
            layout.interaction.placeholder_path
        ));
    }
    if layout.intro_end_z() < layout.intro_min_z() {
        out.push("intro ends inside the clearance plane and will be clamped".into());
    }
    if matches!(source, LayoutSource::BuiltIn) {
        out.push("no layout file found; using the built-in layout".into());
    }
    out
}
