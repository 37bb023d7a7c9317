use anicheck::{
    assets::AssetFile,
    geometry::Size,
    Inspector, HeadlessScene, MemoryStore,
};
use rgb::RGBA8;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn inspector(viewport: (f32, f32)) -> (Inspector<HeadlessScene>, MemoryStore) {
    init_logger();
    let store = MemoryStore::default();
    let inspector = Inspector::new(
        HeadlessScene::default(),
        Box::new(store.clone()),
        Size::new(viewport.0, viewport.1),
    );
    (inspector, store)
}

pub fn png(name: &str, w: usize, h: usize) -> AssetFile {
    let pixels = vec![RGBA8::new(255, 255, 255, 255); w * h];
    let bytes = lodepng::encode32(&pixels, w, h).expect("encoding a test png");
    AssetFile::new(name, bytes)
}

/// Skeleton json, atlas and page image of one Spine export.
pub fn spine(name: &str, animations: &[&str]) -> Vec<AssetFile> {
    let animations: Vec<String> = animations
        .iter()
        .map(|animation| format!("\"{animation}\": {{}}"))
        .collect();
    let skeleton = format!(
        "{{ \"skeleton\": {{ \"spine\": \"4.1.24\" }}, \"animations\": {{ {} }} }}",
        animations.join(", ")
    );
    let atlas = format!("{name}.png\nsize: 2, 2\nbody\n  xy: 0, 0\n  size: 2, 2\n");

    vec![
        AssetFile::new(format!("{name}.json"), skeleton),
        AssetFile::new(format!("{name}.atlas"), atlas),
        png(&format!("{name}.png"), 2, 2),
    ]
}
