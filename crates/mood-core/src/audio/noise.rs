use crate::constants::NOISE_BUFFER_SEC;
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseColor {
    White,
    Pink,
}

/// The two shared noise buffers. Generated once per context and reused by
/// every noise voice.
#[derive(Clone, Debug)]
pub struct NoiseBank {
    pub sample_rate: f32,
    pub white: Vec<f32>,
    pub pink: Vec<f32>,
}

impl NoiseBank {
    pub fn generate(sample_rate: f32, seed: u64) -> Self {
        let len = (sample_rate * NOISE_BUFFER_SEC).max(1.0) as usize;
        let mut rng = StdRng::seed_from_u64(seed);
        let white = (0..len).map(|_| rng.gen::<f32>() * 2.0 - 1.0).collect();
        let pink = pink_noise(len, &mut rng);
        Self {
            sample_rate,
            white,
            pink,
        }
    }

    pub fn samples(&self, color: NoiseColor) -> &[f32] {
        match color {
            NoiseColor::White => &self.white,
            NoiseColor::Pink => &self.pink,
        }
    }
}

/// Paul Kellet's refined pink filter applied to uniform white noise.
fn pink_noise(len: usize, rng: &mut StdRng) -> Vec<f32> {
    let (mut b0, mut b1, mut b2, mut b3, mut b4, mut b5, mut b6) = (0.0f32, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let white = rng.gen::<f32>() * 2.0 - 1.0;
        b0 = 0.99886 * b0 + white * 0.0555179;
        b1 = 0.99332 * b1 + white * 0.0750759;
        b2 = 0.96900 * b2 + white * 0.1538520;
        b3 = 0.86650 * b3 + white * 0.3104856;
        b4 = 0.55000 * b4 + white * 0.5329522;
        b5 = -0.7616 * b5 - white * 0.0168980;
        out.push((b0 + b1 + b2 + b3 + b4 + b5 + b6 + white * 0.5362) * 0.11);
        b6 = white * 0.115926;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_cover_two_seconds_and_stay_bounded() {
        let bank = NoiseBank::generate(8000.0, 7);
        assert_eq!(bank.white.len(), 16000);
        assert_eq!(bank.pink.len(), 16000);
        assert!(bank.white.iter().all(|s| (-1.0..=1.0).contains(s)));
        let rms = (bank.pink.iter().map(|s| s * s).sum::<f32>() / bank.pink.len() as f32).sqrt();
        assert!(rms > 0.01 && rms < 1.0, "pink rms {rms}");
    }
}
