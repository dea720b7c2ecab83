//! Embedded GLSL sources for the effect chain.
//!
//! Every stage shares the same full-screen triangle vertex shader; the
//! fragment shaders are compiled at pipeline creation through wgpu's naga
//! GLSL frontend. The `BlobParams` block layout must match
//! [`crate::gpu::uniforms::BlobUniforms`] field for field (std140 rules), and
//! `BlendParams` must match [`crate::gpu::uniforms::BlendUniforms`].

use std::borrow::Cow;

use wgpu::naga::ShaderStage;

/// Minimal full-screen triangle vertex shader.
///
/// `v_uv` keeps the bottom-left origin (y = 0 at the bottom of the frame),
/// which the blob fragment shader's vertical gradient relies on.
pub(crate) const FULLSCREEN_VERTEX: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// Blob field fragment shader: 3D simplex noise sampled at a scaled UV plus
/// time, mixed with a radial falloff around the smoothed pointer and a
/// vertical gradient, thresholded and mapped between the two gradient colors.
///
/// The noise implementation is the public-domain Simplex 3D by Ian McEwan,
/// Ashima Arts.
pub(crate) const BLOB_FRAGMENT: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform BlobParams {
    vec2 u_resolution;
    vec2 u_mouse;
    vec3 u_max;
    vec3 u_min;
    float u_time;
    float u_scale;
    float u_threshold;
    float u_timeScale;
    float u_scrollOffset;
} params;

layout(set = 0, binding = 1) uniform texture2D u_texture;
layout(set = 0, binding = 2) uniform sampler u_texture_sampler;

vec4 permute(vec4 x) {
    return mod(((x * 34.0) + 1.0) * x, 289.0);
}

vec4 taylorInvSqrt(vec4 r) {
    return 1.79284291400159 - 0.85373472095314 * r;
}

float snoise(vec3 v) {
    const vec2 C = vec2(1.0 / 6.0, 1.0 / 3.0);
    const vec4 D = vec4(0.0, 0.5, 1.0, 2.0);

    // First corner
    vec3 i = floor(v + dot(v, C.yyy));
    vec3 x0 = v - i + dot(i, C.xxx);

    // Other corners
    vec3 g = step(x0.yzx, x0.xyz);
    vec3 l = 1.0 - g;
    vec3 i1 = min(g.xyz, l.zxy);
    vec3 i2 = max(g.xyz, l.zxy);

    vec3 x1 = x0 - i1 + 1.0 * C.xxx;
    vec3 x2 = x0 - i2 + 2.0 * C.xxx;
    vec3 x3 = x0 - 1.0 + 3.0 * C.xxx;

    // Permutations
    i = mod(i, 289.0);
    vec4 p = permute(permute(permute(
                i.z + vec4(0.0, i1.z, i2.z, 1.0))
              + i.y + vec4(0.0, i1.y, i2.y, 1.0))
              + i.x + vec4(0.0, i1.x, i2.x, 1.0));

    // Gradients: N*N points uniformly over a square, mapped onto an octahedron.
    float n_ = 1.0 / 7.0;
    vec3 ns = n_ * D.wyz - D.xzx;

    vec4 j = p - 49.0 * floor(p * ns.z * ns.z);

    vec4 x_ = floor(j * ns.z);
    vec4 y_ = floor(j - 7.0 * x_);

    vec4 x = x_ * ns.x + ns.yyyy;
    vec4 y = y_ * ns.x + ns.yyyy;
    vec4 h = 1.0 - abs(x) - abs(y);

    vec4 b0 = vec4(x.xy, y.xy);
    vec4 b1 = vec4(x.zw, y.zw);

    vec4 s0 = floor(b0) * 2.0 + 1.0;
    vec4 s1 = floor(b1) * 2.0 + 1.0;
    vec4 sh = -step(h, vec4(0.0));

    vec4 a0 = b0.xzyw + s0.xzyw * sh.xxyy;
    vec4 a1 = b1.xzyw + s1.xzyw * sh.zzww;

    vec3 p0 = vec3(a0.xy, h.x);
    vec3 p1 = vec3(a0.zw, h.y);
    vec3 p2 = vec3(a1.xy, h.z);
    vec3 p3 = vec3(a1.zw, h.w);

    // Normalise gradients
    vec4 norm = taylorInvSqrt(vec4(dot(p0, p0), dot(p1, p1), dot(p2, p2), dot(p3, p3)));
    p0 *= norm.x;
    p1 *= norm.y;
    p2 *= norm.z;
    p3 *= norm.w;

    // Mix final noise value
    vec4 m = max(0.6 - vec4(dot(x0, x0), dot(x1, x1), dot(x2, x2), dot(x3, x3)), 0.0);
    m = m * m;
    return 42.0 * dot(m * m, vec4(dot(p0, x0), dot(p1, x1), dot(p2, x2), dot(p3, x3)));
}

void main() {
    float scale = params.u_scale / 1000.0;
    vec4 maxColor = vec4(params.u_max, 1.0);
    vec4 minColor = vec4(params.u_min, 1.0);

    float time = params.u_time * params.u_timeScale;
    vec2 uv = v_uv * params.u_resolution * scale;
    uv.y -= params.u_scrollOffset * params.u_resolution.y * scale;
    float f = snoise(vec3(uv.x, uv.y, time));
    float grad = v_uv.y * 1.5 - 1.0;

    float aspect = params.u_resolution.x / params.u_resolution.y;
    float c = length(
        vec2(v_uv.x * aspect, v_uv.y)
        - vec2(params.u_mouse.x * aspect, params.u_mouse.y)
    );

    float b = (1.0 - (c * 3.0)) / 1.1;
    b = smoothstep(0.0, 1.0, b);

    f = (f + b + grad) / 3.0;
    f = (f + 1.0) / 2.0;
    f = smoothstep(0.4, 0.6, f);
    float x = smoothstep(0.4, 0.6, f);

    outColor = mix(minColor, maxColor, x);
}
";

/// Feedback blend: mixes the freshly rendered frame with the saved previous
/// frame at a fixed ratio, producing the motion-trail look.
pub(crate) const BLEND_FRAGMENT: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform BlendParams {
    float u_mixRatio;
} params;

layout(set = 0, binding = 1) uniform texture2D blend_current_texture;
layout(set = 0, binding = 2) uniform texture2D blend_history_texture;
layout(set = 0, binding = 3) uniform sampler blend_sampler;

void main() {
    vec4 current = texture(sampler2D(blend_current_texture, blend_sampler), v_uv);
    vec4 history = texture(sampler2D(blend_history_texture, blend_sampler), v_uv);
    outColor = mix(current, history, params.u_mixRatio);
}
";

/// Identity copy, used by both the frame-save pass and the final
/// copy-to-screen pass.
pub(crate) const COPY_FRAGMENT: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(set = 0, binding = 0) uniform texture2D copy_input_texture;
layout(set = 0, binding = 1) uniform sampler copy_input_sampler;

void main() {
    outColor = texture(sampler2D(copy_input_texture, copy_input_sampler), v_uv);
}
";

/// Compiles the shared full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FULLSCREEN_VERTEX),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Compiles one of the embedded fragment shaders.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    source: &'static str,
    label: &str,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every uniform the CPU-side block writes must be declared by the GLSL
    /// block, otherwise a rename on one side silently desynchronises the two.
    #[test]
    fn blob_shader_declares_every_uniform() {
        for name in [
            "u_resolution",
            "u_mouse",
            "u_max",
            "u_min",
            "u_time",
            "u_scale",
            "u_threshold",
            "u_timeScale",
            "u_scrollOffset",
            "u_texture",
        ] {
            assert!(
                BLOB_FRAGMENT.contains(name),
                "blob shader is missing uniform {name}"
            );
        }
    }

    #[test]
    fn blend_shader_declares_mix_ratio() {
        assert!(BLEND_FRAGMENT.contains("u_mixRatio"));
    }

    #[test]
    fn fragment_shaders_share_the_vertex_uv_interface() {
        for source in [BLOB_FRAGMENT, BLEND_FRAGMENT, COPY_FRAGMENT] {
            assert!(source.contains("layout(location = 0) in vec2 v_uv;"));
        }
        assert!(FULLSCREEN_VERTEX.contains("layout(location = 0) out vec2 v_uv;"));
    }
}
