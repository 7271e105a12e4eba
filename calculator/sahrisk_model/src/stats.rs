/// Logistic transform of a linear predictor.
///
/// Branches on the sign of `z` so `exp` is only taken of a non-positive
/// argument: never overflows, never NaN for a non-NaN argument, and keeps
/// tiny probabilities for very negative `z` instead of flushing them to 0.
pub fn logistic(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
