//! Quadrature tables on the reference triangle `{(ξ, η) : ξ, η ≥ 0, ξ + η ≤ 1}` and the reference
//! segment `[0, 1]`.
//!
//! Triangle entries are `[weight, ξ, η]`, segment entries are `[weight, ξ]`.

pub const TRIANGLE_P0: [[f64; 3]; 1] = [[0.5, 0.3333333333333333, 0.3333333333333333]];

pub const TRIANGLE_P2: [[f64; 3]; 3] = [
    [0.16666666666666666, 0.16666666666666666, 0.16666666666666666],
    [0.16666666666666666, 0.16666666666666666, 0.6666666666666666],
    [0.16666666666666666, 0.6666666666666666, 0.16666666666666666],
];

pub const TRIANGLE_P4: [[f64; 3]; 6] = [
    [0.0549758718276609, 0.0915762135097707, 0.0915762135097707],
    [0.0549758718276609, 0.0915762135097707, 0.816847572980459],
    [0.0549758718276609, 0.816847572980459, 0.0915762135097707],
    [0.111690794839006, 0.445948490915965, 0.445948490915965],
    [0.111690794839006, 0.445948490915965, 0.10810301816807],
    [0.111690794839006, 0.10810301816807, 0.445948490915965],
];

pub const TRIANGLE_P6: [[f64; 3]; 12] = [
    [0.0254224531851034, 0.0630890144915022, 0.0630890144915022],
    [0.0254224531851034, 0.0630890144915022, 0.873821971016996],
    [0.0254224531851034, 0.873821971016996, 0.0630890144915022],
    [0.0583931378631897, 0.24928674517091, 0.24928674517091],
    [0.0583931378631897, 0.24928674517091, 0.501426509658179],
    [0.0583931378631897, 0.501426509658179, 0.24928674517091],
    [0.0414255378091868, 0.0531450498448169, 0.310352451033784],
    [0.0414255378091868, 0.310352451033784, 0.0531450498448169],
    [0.0414255378091868, 0.0531450498448169, 0.636502499121399],
    [0.0414255378091868, 0.636502499121399, 0.0531450498448169],
    [0.0414255378091868, 0.310352451033784, 0.636502499121399],
    [0.0414255378091868, 0.636502499121399, 0.310352451033784],
];

pub const SEGMENT_P0: [[f64; 2]; 1] = [[1.0, 0.5]];

pub const SEGMENT_P2: [[f64; 2]; 2] = [[0.5, 0.21132486540518708], [0.5, 0.7886751345948129]];
