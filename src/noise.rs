//! Lattice gradient noise, used to perturb patterns.

/// The classic gradient noise permutation table.
const PERMUTATION: [usize; 256] = [
    151, 160, 137,  91,  90,  15, 131,  13, 201,  95,  96,  53, 194, 233,
      7, 225, 140,  36, 103,  30,  69, 142,   8,  99,  37, 240,  21,  10,
     23, 190,   6, 148, 247, 120, 234,  75,   0,  26, 197,  62,  94, 252,
    219, 203, 117,  35,  11,  32,  57, 177,  33,  88, 237, 149,  56,  87,
    174,  20, 125, 136, 171, 168,  68, 175,  74, 165,  71, 134, 139,  48,
     27, 166,  77, 146, 158, 231,  83, 111, 229, 122,  60, 211, 133, 230,
    220, 105,  92,  41,  55,  46, 245,  40, 244, 102, 143,  54,  65,  25,
     63, 161,   1, 216,  80,  73, 209,  76, 132, 187, 208,  89,  18, 169,
    200, 196, 135, 130, 116, 188, 159,  86, 164, 100, 109, 198, 173, 186,
      3,  64,  52, 217, 226, 250, 124, 123,   5, 202,  38, 147, 118, 126,
    255,  82,  85, 212, 207, 206,  59, 227,  47,  16,  58,  17, 182, 189,
     28,  42, 223, 183, 170, 213, 119, 248, 152,   2,  44, 154, 163,  70,
    221, 153, 101, 155, 167,  43, 172,   9, 129,  22,  39, 253,  19,  98,
    108, 110,  79, 113, 224, 232, 178, 185, 112, 104, 218, 246,  97, 228,
    251,  34, 242, 193, 238, 210, 144,  12, 191, 179, 162, 241,  81,  51,
    145, 235, 249,  14, 239, 107,  49, 192, 214,  31, 181, 199, 106, 157,
    184,  84, 204, 176, 115, 121,  50,  45, 127,   4, 150, 254, 138, 236,
    205,  93, 222, 114,  67,  29,  24,  72, 243, 141, 128, 195,  78,  66,
    215,  61, 156, 180,
];

fn perm(i: usize) -> usize {
    PERMUTATION[i % 256]
}

/// Smoothstep interpolation weight.
fn fade(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of a lattice gradient (selected by `hash`) and the offset
/// `(x, y, z)` from that lattice corner.
fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };

    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

/// Samples gradient noise at a point in 3D space.
///
/// The result lies in `[0.0, 1.0]` and varies smoothly; points at integer
/// lattice coordinates always evaluate to `0.5`, since every gradient term
/// vanishes there.
pub fn noise(x: f64, y: f64, z: f64) -> f64 {
    // Lattice cell containing the point, folded into the table's range.
    let xi = (x.floor().rem_euclid(256.0)) as usize;
    let yi = (y.floor().rem_euclid(256.0)) as usize;
    let zi = (z.floor().rem_euclid(256.0)) as usize;

    // Offset of the point within its cell.
    let xf = x - x.floor();
    let yf = y - y.floor();
    let zf = z - z.floor();

    let u = fade(xf);
    let v = fade(yf);
    let w = fade(zf);

    // Hash each of the eight cell corners.
    let aaa = perm(perm(perm(xi) + yi) + zi);
    let aba = perm(perm(perm(xi) + yi + 1) + zi);
    let aab = perm(perm(perm(xi) + yi) + zi + 1);
    let abb = perm(perm(perm(xi) + yi + 1) + zi + 1);
    let baa = perm(perm(perm(xi + 1) + yi) + zi);
    let bba = perm(perm(perm(xi + 1) + yi + 1) + zi);
    let bab = perm(perm(perm(xi + 1) + yi) + zi + 1);
    let bbb = perm(perm(perm(xi + 1) + yi + 1) + zi + 1);

    let x1 = lerp(u,
        grad(aaa, xf, yf, zf),
        grad(baa, xf - 1.0, yf, zf));
    let x2 = lerp(u,
        grad(aba, xf, yf - 1.0, zf),
        grad(bba, xf - 1.0, yf - 1.0, zf));
    let y1 = lerp(v, x1, x2);

    let x3 = lerp(u,
        grad(aab, xf, yf, zf - 1.0),
        grad(bab, xf - 1.0, yf, zf - 1.0));
    let x4 = lerp(u,
        grad(abb, xf, yf - 1.0, zf - 1.0),
        grad(bbb, xf - 1.0, yf - 1.0, zf - 1.0));
    let y2 = lerp(v, x3, x4);

    let n = lerp(w, y1, y2);

    // Map from [-1, 1] to [0, 1].
    (n + 1.0) / 2.0
}

/* Tests */

#[test]
fn noise_at_lattice_points() {
    assert_eq!(noise(0.0, 0.0, 0.0), 0.5);
    assert_eq!(noise(1.0, 0.0, 0.0), 0.5);
    assert_eq!(noise(-3.0, 7.0, 12.0), 0.5);
}

#[test]
fn noise_is_deterministic() {
    let a = noise(0.3, 1.7, -2.4);
    let b = noise(0.3, 1.7, -2.4);

    assert_eq!(a, b);
}

#[test]
fn noise_is_bounded() {
    let mut i = 0;
    while i < 100 {
        let t = i as f64 * 0.173;
        let n = noise(t, t * 0.5, -t);

        assert!(n >= 0.0 && n <= 1.0);
        i += 1;
    }
}

#[test]
fn noise_varies_between_lattice_points() {
    // If noise were constant, perturbed patterns would degenerate to their
    // unperturbed base.
    let samples = [
        noise(0.5, 0.5, 0.5),
        noise(0.25, 0.75, 0.5),
        noise(1.5, 0.25, -0.75),
    ];

    assert!(samples.iter().any(|n| (n - 0.5).abs() > 1e-9));
}
