use std::path::PathBuf;

use voxel_terrain::config::ConfigError;
use voxel_terrain::voxels::world::WorldError;
use voxel_terrain::{run, RunOptions};

fn bundled_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("world_config.json")
}

#[test]
fn run_can_be_called_repeatedly() {
    let first = run(RunOptions {
        config: Some(bundled_config()),
        ..RunOptions::default()
    })
    .unwrap();
    let second = run(RunOptions {
        config: Some(bundled_config()),
        ..RunOptions::default()
    })
    .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.chunks, 32);
}

#[test]
fn seed_and_stitch_overrides_apply() {
    let isolated = run(RunOptions {
        config: Some(bundled_config()),
        seed: Some(-5),
        stitch: false,
    })
    .unwrap();
    let stitched = run(RunOptions {
        config: Some(bundled_config()),
        seed: Some(-5),
        stitch: true,
    })
    .unwrap();

    assert_eq!(isolated.solid_voxels, stitched.solid_voxels);
    assert!(stitched.quads <= isolated.quads);
}

#[test]
fn missing_config_file_is_reported() {
    let result = run(RunOptions {
        config: Some(PathBuf::from("/definitely/not/here/world.json")),
        ..RunOptions::default()
    });
    assert!(matches!(result, Err(WorldError::Config(ConfigError::Io { .. }))));
}
