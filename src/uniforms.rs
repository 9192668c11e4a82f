//! The uniform record read by every fragment invocation of `mandel.wgsl`.

use bytemuck::{Pod, Zeroable};

use crate::screen;

/// WGSL source of the fractal shader.
pub const SHADER: &str = include_str!("mandel.wgsl");

/// [`bytemuck`]-compatible mirror of `mandel.wgsl#Uniforms`.
///
/// The field order, widths and tail padding have to match the WGSL struct
/// exactly. The GPU reads whatever bytes are there, so a mismatch renders
/// garbage instead of failing.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Uniforms {
    /// Half-extent of the visible window on the complex plane.
    pub scale: [f32; 2],
    /// Centre of the visible window on the complex plane.
    pub translation: [f32; 2],
    /// Framebuffer size in pixels.
    pub window_size: [f32; 2],
    /// Escape-time iteration cap.
    pub iterations: i32,
    /// Divisor turning an escape count into a hue.
    pub colour_count: i32,
    /// Hue offset.
    pub shift: f32,
    padding: [u32; 3],
}

impl Uniforms {
    pub const DEFAULT_SCALE: [f32; 2] = [1.5, 1.5];
    pub const DEFAULT_TRANSLATION: [f32; 2] = [-0.75, 0.0];
    pub const DEFAULT_ITERATIONS: i32 = 256;
    pub const DEFAULT_COLOUR_COUNT: i32 = 256;

    pub fn new(window_size: screen::Size) -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
            translation: Self::DEFAULT_TRANSLATION,
            window_size: [window_size.width as f32, window_size.height as f32],
            iterations: Self::DEFAULT_ITERATIONS,
            colour_count: Self::DEFAULT_COLOUR_COUNT,
            shift: 0.0,
            padding: [0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{align_of, offset_of, size_of};

    use super::*;

    fn shader_module() -> naga::Module {
        let module = naga::front::wgsl::parse_str(SHADER)
            .unwrap_or_else(|error| panic!("{}", error.emit_to_string(SHADER)));

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .unwrap_or_else(|error| panic!("mandel.wgsl failed validation: {:?}", error));

        module
    }

    #[test]
    fn size_is_a_multiple_of_sixteen() {
        assert_eq!(size_of::<Uniforms>(), 48);
        assert_eq!(size_of::<Uniforms>() % 16, 0);
        assert_eq!(align_of::<Uniforms>(), 4);
    }

    #[test]
    fn fields_are_in_declared_order() {
        assert_eq!(offset_of!(Uniforms, scale), 0);
        assert_eq!(offset_of!(Uniforms, translation), 8);
        assert_eq!(offset_of!(Uniforms, window_size), 16);
        assert_eq!(offset_of!(Uniforms, iterations), 24);
        assert_eq!(offset_of!(Uniforms, colour_count), 28);
        assert_eq!(offset_of!(Uniforms, shift), 32);
    }

    #[test]
    fn bytes_follow_field_order() {
        let mut uniforms = Uniforms::new(screen::Size {
            width: 512,
            height: 256,
        });
        uniforms.shift = 0.25;

        let bytes = bytemuck::bytes_of(&uniforms);
        let word = |offset: usize| -> [u8; 4] { bytes[offset..offset + 4].try_into().unwrap() };

        assert_eq!(f32::from_ne_bytes(word(0)), 1.5);
        assert_eq!(f32::from_ne_bytes(word(8)), -0.75);
        assert_eq!(f32::from_ne_bytes(word(16)), 512.0);
        assert_eq!(f32::from_ne_bytes(word(20)), 256.0);
        assert_eq!(i32::from_ne_bytes(word(24)), 256);
        assert_eq!(i32::from_ne_bytes(word(28)), 256);
        assert_eq!(f32::from_ne_bytes(word(32)), 0.25);
        assert!(bytes[36..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn shader_struct_matches_rust_layout() {
        let module = shader_module();

        let (members, span) = module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(name), naga::TypeInner::Struct { members, span }) if name == "Uniforms" => {
                    Some((members.clone(), *span))
                }
                _ => None,
            })
            .expect("mandel.wgsl declares no `Uniforms` struct");

        assert_eq!(span as usize, size_of::<Uniforms>());

        let offsets: Vec<(String, u32)> = members
            .iter()
            .map(|member| (member.name.clone().unwrap_or_default(), member.offset))
            .collect();
        let expected: Vec<(String, u32)> = [
            ("scale", offset_of!(Uniforms, scale)),
            ("translation", offset_of!(Uniforms, translation)),
            ("window_size", offset_of!(Uniforms, window_size)),
            ("iterations", offset_of!(Uniforms, iterations)),
            ("colour_count", offset_of!(Uniforms, colour_count)),
            ("shift", offset_of!(Uniforms, shift)),
            ("padding0", offset_of!(Uniforms, padding)),
            ("padding1", offset_of!(Uniforms, padding) + 4),
            ("padding2", offset_of!(Uniforms, padding) + 8),
        ]
        .iter()
        .map(|(name, offset)| (name.to_string(), *offset as u32))
        .collect();

        assert_eq!(offsets, expected);
    }

    #[test]
    fn shader_exposes_both_entry_points() {
        let module = shader_module();
        let names: Vec<&str> = module
            .entry_points
            .iter()
            .map(|entry_point| entry_point.name.as_str())
            .collect();

        assert!(names.contains(&"vertex_main"));
        assert!(names.contains(&"fragment_main"));
    }
}
