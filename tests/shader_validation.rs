//! Validation of the built-in WGSL shaders.
//!
//! Every shader ships as a static string, so a typo would otherwise only
//! surface as a pipeline creation panic at runtime. These tests run each
//! one through naga's parser and validator and check the entry points the
//! pipelines bind to.

const SEED_SHADER: &str = include_str!("../src/shaders/seed.wgsl");
const VELOCITY_SHADER: &str = include_str!("../src/shaders/velocity.wgsl");
const POSITION_SHADER: &str = include_str!("../src/shaders/position.wgsl");
const POINTS_SHADER: &str = include_str!("../src/shaders/points.wgsl");
const STARS_SHADER: &str = include_str!("../src/shaders/stars.wgsl");

/// Parses and validates a WGSL module.
fn validate_wgsl(source: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| format!("WGSL parse error: {:?}", e))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(module)
}

fn entry_point_names(module: &naga::Module) -> Vec<&str> {
    module
        .entry_points
        .iter()
        .map(|ep| ep.name.as_str())
        .collect()
}

// ============================================================================
// State Pass Shaders
// ============================================================================

#[test]
fn test_seed_shader_validates() {
    let module = validate_wgsl(SEED_SHADER).expect("seed shader should be valid");
    let names = entry_point_names(&module);
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_velocity_shader_validates() {
    let module = validate_wgsl(VELOCITY_SHADER).expect("velocity shader should be valid");
    let names = entry_point_names(&module);
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_position_shader_validates() {
    let module = validate_wgsl(POSITION_SHADER).expect("position shader should be valid");
    let names = entry_point_names(&module);
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_velocity_shader_reads_both_state_textures() {
    // The velocity pass samples last frame's velocity and position, so it
    // must declare two texture bindings on top of the uniform buffer.
    let module = validate_wgsl(VELOCITY_SHADER).expect("velocity shader should be valid");
    let textures = module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == naga::AddressSpace::Handle)
        .count();
    assert_eq!(textures, 2);
}

#[test]
fn test_position_shader_has_no_uniforms() {
    // Position integration is pure texture arithmetic.
    let module = validate_wgsl(POSITION_SHADER).expect("position shader should be valid");
    let uniforms = module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == naga::AddressSpace::Uniform)
        .count();
    assert_eq!(uniforms, 0);
}

// ============================================================================
// Render Shaders
// ============================================================================

#[test]
fn test_points_shader_validates() {
    let module = validate_wgsl(POINTS_SHADER).expect("points shader should be valid");
    let names = entry_point_names(&module);
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_stars_shader_validates() {
    let module = validate_wgsl(STARS_SHADER).expect("stars shader should be valid");
    let names = entry_point_names(&module);
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_state_shaders_share_uniform_struct() {
    // The seed and velocity passes bind the same uniform buffer, so both
    // shaders must declare an identical uniform block.
    let seed_struct = uniform_block(SEED_SHADER);
    let velocity_struct = uniform_block(VELOCITY_SHADER);
    assert_eq!(seed_struct, velocity_struct);
}

/// Extracts the `struct SimUniforms { ... }` text from a shader source.
fn uniform_block(source: &str) -> String {
    let start = source
        .find("struct SimUniforms")
        .expect("shader should declare SimUniforms");
    let end = source[start..]
        .find('}')
        .map(|i| start + i + 1)
        .expect("struct should be closed");
    source[start..end].to_string()
}
