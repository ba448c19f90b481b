//! Static content of the star: geometry, hot-vertex payloads, global words.

/// Star vertices before scaling: 6 outer tips, then 6 inner waist points.
pub const STAR_POINTS: [[f32; 3]; 12] = [
    [0.0, 250.0, 0.0],  // Top (0)
    [0.0, -250.0, 0.0], // Bottom (1)
    [250.0, 0.0, 0.0],  // Right (2)
    [-250.0, 0.0, 0.0], // Left (3)
    [0.0, 0.0, 250.0],  // Front (4)
    [0.0, 0.0, -250.0], // Back (5)
    [0.0, 40.0, 0.0],   // Top inner (6)
    [0.0, -40.0, 0.0],  // Bottom inner (7)
    [40.0, 0.0, 0.0],   // Right inner (8)
    [-40.0, 0.0, 0.0],  // Left inner (9)
    [0.0, 0.0, 40.0],   // Front inner (10)
    [0.0, 0.0, -40.0],  // Back inner (11)
];

/// Edge list as authored; contains a few repeated pairs, which
/// [`super::Polyhedron::new`] folds.
pub const STAR_EDGES: [(usize, usize); 44] = [
    // Top tip
    (0, 8), (0, 9), (0, 10), (0, 11), (8, 6), (9, 6), (10, 6), (11, 6),
    // Bottom tip
    (1, 8), (1, 9), (1, 10), (1, 11), (8, 7), (9, 7), (10, 7), (11, 7),
    // Right tip
    (2, 6), (2, 7), (2, 10), (2, 11),
    // Left tip
    (3, 6), (3, 7), (3, 10), (3, 11),
    // Front tip
    (4, 6), (4, 7), (4, 8), (4, 9),
    // Back tip
    (5, 6), (5, 7), (5, 8), (5, 9),
    // Inner octahedron
    (6, 8), (8, 10), (10, 6), (7, 8), (8, 10), (10, 7),
    (6, 9), (9, 11), (11, 6), (7, 9), (9, 11), (11, 7),
];

/// Payload for one hot vertex.
pub struct HotVertexSpec {
    pub vertex_index: usize,
    pub labels: &'static [&'static str],
    pub menu_title: &'static str,
    /// (label, action token)
    pub menu_items: &'static [(&'static str, &'static str)],
}

pub const HOT_VERTICES: [HotVertexSpec; 6] = [
    HotVertexSpec {
        vertex_index: 0,
        labels: &["neural-1", "synapse-1", "cortex-1", "brain-1", "mind-1"],
        menu_title: "Neural",
        menu_items: &[
            ("About", "notify:Systems programmer, occasional cartographer of latent space."),
            ("Research", "https://example.org/research"),
            ("Reading list", "https://example.org/reading"),
        ],
    },
    HotVertexSpec {
        vertex_index: 1,
        labels: &["quantum-2", "particle-2", "wave-2", "field-2", "energy-2"],
        menu_title: "Quantum",
        menu_items: &[
            ("Experiments", "https://example.org/experiments"),
            ("Notebook", "https://example.org/notebook"),
        ],
    },
    HotVertexSpec {
        vertex_index: 2,
        labels: &["data-3", "stream-3", "flow-3", "process-3", "compute-3"],
        menu_title: "Data",
        menu_items: &[
            ("Projects", "https://example.org/projects"),
            ("Datasets", "https://example.org/datasets"),
            ("Benchmarks", "https://example.org/benchmarks"),
        ],
    },
    HotVertexSpec {
        vertex_index: 3,
        labels: &["cyber-4", "network-4", "matrix-4", "grid-4", "mesh-4"],
        menu_title: "Cyber",
        menu_items: &[
            ("Source", "https://example.org/source"),
            ("Talks", "https://example.org/talks"),
        ],
    },
    HotVertexSpec {
        vertex_index: 4,
        labels: &["bio-5", "synth-5", "hybrid-5", "fusion-5", "merge-5"],
        menu_title: "Bio",
        menu_items: &[
            ("Now", "notify:Currently building small tools for large graphs."),
            ("CV", "https://example.org/cv"),
        ],
    },
    HotVertexSpec {
        vertex_index: 5,
        labels: &["void-6", "deep-6", "space-6", "null-6", "zero-6"],
        menu_title: "Void",
        menu_items: &[
            ("Contact", "mailto:hello@example.org"),
            ("Colophon", "notify:Drawn with a single perspective divide."),
        ],
    },
];

/// Words drifting in the field when no vertex is engaged.
pub const GLOBAL_WORDS: &[&str] = &[
    // Cognition
    "neural", "cognition", "sentient", "quantum", "algorithm",
    "synaptic", "cortical", "protocol", "binary", "synthetic",
    "autonomous", "recursive", "heuristic", "cybernetic", "biometric",
    // Systems
    "nexus", "matrix", "cipher", "proxy", "vertex",
    "kernel", "vector", "tensor", "daemon", "codec",
    // Operations
    "runtime", "process", "thread", "buffer", "cache",
    "compile", "execute", "decrypt", "encode", "parse",
    // Texture
    "synapse", "cortex", "cyber", "lattice", "signal",
];

const NUMERALS: [&str; 12] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

/// Roman numeral for a 1-based index; `"?"` outside 1..=12.
pub fn roman(n: usize) -> &'static str {
    n.checked_sub(1)
        .and_then(|i| NUMERALS.get(i))
        .copied()
        .unwrap_or("?")
}
