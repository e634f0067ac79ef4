use std::sync::Arc;

use cgmath::Point3;
use voxel_terrain::config::{WorldConfig, WorldSettings};
use voxel_terrain::meshing::GreedyMesher;
use voxel_terrain::voxels::block::block_side::BlockSide;
use voxel_terrain::voxels::noise::{ConstantNoise, NoiseKind};
use voxel_terrain::voxels::terrain::TerrainGenerator;
use voxel_terrain::voxels::world::{ChunkExtent, WorldError, WorldGrid};

fn small_config() -> WorldConfig {
    WorldConfig {
        seed: 4242,
        chunk_size: 8,
        frequency: 0.05,
        world_extent: [2, 1, 2],
        worker_threads: 2,
        ..WorldConfig::default()
    }
}

#[test]
fn builds_every_chunk_in_the_extent() {
    let world = WorldGrid::new(&small_config()).unwrap();

    assert_eq!(world.len(), 4);
    assert_eq!(world.seed(), 4242);
    for x in 0..2 {
        for z in 0..2 {
            let chunk = world.get_chunk_at(Point3::new(x, 0, z)).unwrap();
            assert_eq!(chunk.position(), Point3::new(x, 0, z));
            assert_eq!(chunk.origin(), Point3::new(x * 8, 0, z * 8));
        }
    }
}

#[test]
fn lookups_outside_the_world_are_absent() {
    let world = WorldGrid::new(&small_config()).unwrap();
    assert!(world.get_chunk_at(Point3::new(-1, 0, 0)).is_none());
    assert!(world.get_chunk_at(Point3::new(0, 1, 0)).is_none());
    assert!(world.get_chunk_at(Point3::new(2, 0, 2)).is_none());
}

#[test]
fn chunk_bounds_lie_within_the_chunk() {
    let world = WorldGrid::new(&small_config()).unwrap();
    for chunk in world.chunks() {
        if let Some(bounds) = chunk.bounds() {
            assert!(chunk.extent_bounds().encloses(&bounds), "{:?}", chunk.position());
        }
    }
}

#[test]
fn chunks_match_their_generated_terrain() {
    let config = small_config();
    let settings = config.validate().unwrap();
    let world = WorldGrid::new(&config).unwrap();
    let generator = TerrainGenerator::from_settings(&settings);

    for chunk in world.chunks() {
        assert_eq!(**chunk.grid(), generator.generate(chunk.position()));
    }
}

#[test]
fn worlds_are_deterministic() {
    let a = WorldGrid::new(&small_config()).unwrap();
    let b = WorldGrid::new(&WorldConfig {
        worker_threads: 1,
        ..small_config()
    })
    .unwrap();

    assert_eq!(a.stats(), b.stats());
    for chunk in a.chunks() {
        let other = b.get_chunk_at(chunk.position()).unwrap();
        assert_eq!(chunk.grid(), other.grid());
        assert_eq!(chunk.mesh(), other.mesh());
    }
}

#[test]
fn stitching_never_adds_quads() {
    let config = WorldConfig {
        world_extent: [2, 2, 2],
        max_height: Some(16),
        ..small_config()
    };
    let isolated = WorldGrid::new(&config).unwrap();
    let stitched = WorldGrid::new(&WorldConfig {
        stitch_chunk_borders: true,
        ..config
    })
    .unwrap();

    assert_eq!(isolated.len(), stitched.len());
    for chunk in isolated.chunks() {
        let other = stitched.get_chunk_at(chunk.position()).unwrap();
        assert!(other.mesh().quad_count() <= chunk.mesh().quad_count());
        assert!(other.mesh().face_area() <= chunk.mesh().face_area());
    }
}

#[test]
fn stitched_solid_neighbors_share_no_faces() {
    let settings = WorldSettings {
        chunk_size: 4,
        max_height: 100,
        extent: ChunkExtent::new(2, 1, 1),
        worker_threads: 2,
        stitch_chunk_borders: true,
        ..WorldSettings::default()
    };
    let world = WorldGrid::with_noise(settings, Arc::new(ConstantNoise(1.0))).unwrap();

    let left = world.get_chunk_at(Point3::new(0, 0, 0)).unwrap();
    let right = world.get_chunk_at(Point3::new(1, 0, 0)).unwrap();
    assert!(left.mesh().side(BlockSide::RIGHT).quads.is_empty());
    assert!(right.mesh().side(BlockSide::LEFT).quads.is_empty());
    assert_eq!(left.mesh().side(BlockSide::LEFT).quads.len(), 1);
    assert_eq!(right.mesh().side(BlockSide::RIGHT).quads.len(), 1);
}

#[test]
fn flat_world_has_one_top_quad_per_surface_chunk() {
    let settings = WorldSettings {
        chunk_size: 8,
        max_height: 20,
        extent: ChunkExtent::new(2, 3, 2),
        worker_threads: 3,
        ..WorldSettings::default()
    };
    // h01 = 0.5, so the surface is world y = 10, inside chunk layer y = 1.
    let world = WorldGrid::with_noise(settings, Arc::new(ConstantNoise(0.0))).unwrap();

    let stats = world.stats();
    assert_eq!(stats.chunks, 12);
    assert_eq!(stats.solid_voxels, 4 * (8 * 8 * 8 + 8 * 8 * 3));

    for chunk in world.chunks() {
        let tops = &chunk.mesh().side(BlockSide::TOP).quads;
        match chunk.position().y {
            0 | 1 => {
                assert_eq!(tops.len(), 1);
                assert_eq!((tops[0].width, tops[0].height), (8, 8));
            }
            _ => assert!(chunk.mesh().is_empty()),
        }
    }
}

#[test]
fn invalid_configuration_fails_before_generation() {
    let config = WorldConfig {
        chunk_size: 0,
        ..small_config()
    };
    assert!(matches!(WorldGrid::new(&config), Err(WorldError::Config(_))));
}

#[test]
fn empty_extent_builds_an_empty_world() {
    let world = WorldGrid::new(&WorldConfig {
        world_extent: [0, 3, 3],
        ..small_config()
    })
    .unwrap();
    assert!(world.is_empty());
    assert_eq!(world.stats().quads, 0);
}

#[test]
fn simplex_worlds_mesh_exactly_their_exposed_faces() {
    let config = WorldConfig {
        noise: NoiseKind::Simplex,
        world_extent: [1, 1, 1],
        chunk_size: 12,
        max_height: Some(12),
        ..small_config()
    };
    let world = WorldGrid::new(&config).unwrap();
    let chunk = world.get_chunk_at(Point3::new(0, 0, 0)).unwrap();
    let grid = chunk.grid();

    let exposed: u64 = grid
        .iter()
        .map(|(coord, _)| {
            BlockSide::all()
                .into_iter()
                .filter(|side| !grid.is_solid(coord + side.offset()))
                .count() as u64
        })
        .sum();
    assert_eq!(chunk.mesh().face_area(), exposed);
    assert_eq!(*chunk.mesh(), GreedyMesher::new(12).mesh(grid));
}

#[test]
fn oversized_extent_is_a_config_error() {
    let config = WorldConfig {
        world_extent: [1 << 30; 3],
        ..small_config()
    };
    assert!(matches!(WorldGrid::new(&config), Err(WorldError::Config(_))));
}

#[test]
fn world_bounds_enclose_every_chunk() {
    let world = WorldGrid::new(&small_config()).unwrap();
    let bounds = world.bounds().unwrap();
    for chunk in world.chunks() {
        if let Some(chunk_bounds) = chunk.bounds() {
            assert!(bounds.encloses(&chunk_bounds));
        }
    }

    let empty = WorldGrid::new(&WorldConfig {
        world_extent: [0, 1, 1],
        ..small_config()
    })
    .unwrap();
    assert!(empty.bounds().is_none());
}
