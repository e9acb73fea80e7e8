//! Shared meshes, materials, and the procedural ground texture.
//!
//! Dimension-independent assets are created once on first build and kept
//! in `SiteAssets`; meshes that depend on the building's dimensions are
//! created per build by the spawn layer.

use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::math::Affine2;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use fastnoise_lite::{FastNoiseLite, NoiseType};

use simulation::config::{GROUND_SIZE, PAD_HEIGHT, PAD_RADIUS};

use crate::scene_plan::{door_size, window_size};

const GROUND_TEXTURE_SIZE: u32 = 128;
const GROUND_TEXTURE_REPEAT: f32 = 25.0;
const GRASS_NOISE_SEED: i32 = 4242;

// ---------------------------------------------------------------------------
// Shared assets (lazy-initialised)
// ---------------------------------------------------------------------------

/// Mesh and material handles reused across builds, created once on first
/// use -- the same lifecycle for every rebuild, so handles stay stable.
#[derive(Resource, Clone)]
pub struct SiteAssets {
    pub ground_mesh: Handle<Mesh>,
    pub ground_material: Handle<StandardMaterial>,
    pub pad_mesh: Handle<Mesh>,
    pub concrete_material: Handle<StandardMaterial>,
    pub slab_material: Handle<StandardMaterial>,
    pub brick_material: Handle<StandardMaterial>,
    pub roof_material: Handle<StandardMaterial>,
    pub door_mesh: Handle<Mesh>,
    pub door_material: Handle<StandardMaterial>,
    pub window_front_mesh: Handle<Mesh>,
    pub window_side_mesh: Handle<Mesh>,
    pub glass_material: Handle<StandardMaterial>,
}

/// Lazily initialise the shared site assets on first need.
pub fn ensure_assets(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    existing: &Option<Res<SiteAssets>>,
) -> SiteAssets {
    if let Some(assets) = existing {
        return (*assets).clone();
    }

    let grass = images.add(build_ground_texture());
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.65, 0.4),
        base_color_texture: Some(grass),
        uv_transform: Affine2::from_scale(Vec2::splat(GROUND_TEXTURE_REPEAT)),
        perceptual_roughness: 1.0,
        ..default()
    });

    let assets = SiteAssets {
        ground_mesh: meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE)),
        ground_material,
        pad_mesh: meshes.add(Cylinder::new(PAD_RADIUS, PAD_HEIGHT)),
        concrete_material: materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0x77, 0x77, 0x77),
            perceptual_roughness: 0.9,
            ..default()
        }),
        slab_material: materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0xcc, 0xcc, 0xcc),
            perceptual_roughness: 0.9,
            ..default()
        }),
        brick_material: materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0xa0, 0x52, 0x2d),
            perceptual_roughness: 0.95,
            ..default()
        }),
        roof_material: materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0x99, 0x66, 0x33),
            perceptual_roughness: 0.8,
            ..default()
        }),
        door_mesh: meshes.add(Cuboid::from_size(door_size())),
        door_material: materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0x8b, 0x45, 0x13),
            perceptual_roughness: 0.7,
            ..default()
        }),
        window_front_mesh: meshes.add(Cuboid::from_size(window_size(false))),
        window_side_mesh: meshes.add(Cuboid::from_size(window_size(true))),
        glass_material: materials.add(StandardMaterial {
            base_color: Color::srgba_u8(0xad, 0xd8, 0xe6, 0xb3),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 0.1,
            ..default()
        }),
    };

    commands.insert_resource(assets.clone());
    assets
}

// ---------------------------------------------------------------------------
// Procedural ground texture
// ---------------------------------------------------------------------------

/// Tileable grass: green modulated by low-frequency noise. Generated in
/// memory so a missing asset file can never blank the ground.
fn build_ground_texture() -> Image {
    let mut noise = FastNoiseLite::with_seed(GRASS_NOISE_SEED);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(0.08));

    let size = GROUND_TEXTURE_SIZE;
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let n = (noise.get_noise_2d(x as f32, y as f32) + 1.0) * 0.5;
            let r = (90.0 + n * 40.0) as u8;
            let g = (140.0 + n * 50.0) as u8;
            let b = (60.0 + n * 30.0) as u8;
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }

    let mut image = Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });
    image
}

// ---------------------------------------------------------------------------
// Roof mesh
// ---------------------------------------------------------------------------

/// Build a four-sided pyramid, centred at the origin: apex at +height/2,
/// square base (corners at `radius` from the axis) at -height/2. Flat
/// per-face normals; yaw is applied by the spawn transform.
pub fn build_roof_mesh(radius: f32, height: f32) -> Mesh {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let apex = Vec3::new(0.0, height / 2.0, 0.0);
    let base_y = -height / 2.0;
    let corners: Vec<Vec3> = (0..4)
        .map(|k| {
            let angle = k as f32 * std::f32::consts::FRAC_PI_2;
            Vec3::new(radius * angle.cos(), base_y, radius * angle.sin())
        })
        .collect();

    let mut add_triangle = |a: Vec3, b: Vec3, c: Vec3| {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let base = positions.len() as u32;
        for v in [a, b, c] {
            positions.push([v.x, v.y, v.z]);
            normals.push([normal.x, normal.y, normal.z]);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    };

    // Four slanted faces. Corners advance counter-clockwise seen from
    // above (+Y), so apex -> next -> current winds outward.
    for k in 0..4 {
        let current = corners[k];
        let next = corners[(k + 1) % 4];
        add_triangle(apex, next, current);
    }

    // Base, facing down.
    add_triangle(corners[0], corners[1], corners[2]);
    add_triangle(corners[0], corners[2], corners[3]);

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
