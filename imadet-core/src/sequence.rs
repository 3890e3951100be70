//! File names of the animation frames for a trial.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::warn;

use crate::stimulus::ImageSequenceType;

pub const IMAGE_LOCATION: &str = "../media/images/";
pub const IMAGE_FILE_EXTENSION: &str = ".png";
/// Number of distinct noise frames shipped with the media.
pub const NOISE_FRAME_COUNT: u32 = 20;

/// Builds the frame list for one animation.
///
/// Noise animations are a random permutation of the noise frames. Grating
/// animations ramp linearly from `start_level` to `end_level`, with every
/// intermediate level rounded half-up.
///
/// Noise animations never exceed `NOISE_FRAME_COUNT` frames, so callers
/// keep `length` at or below it to give both kinds the same duration.
/// Levels below 1 (reachable when the staircase has no floor) produce file
/// names with no matching image; a warning is logged when that happens.
pub fn generate_image_sequence<R: Rng>(
    rng: &mut R,
    start_level: i32,
    end_level: i32,
    length: usize,
    kind: ImageSequenceType,
) -> Vec<String> {
    match kind {
        ImageSequenceType::Noise => {
            let mut numbers: Vec<u32> = (1..=NOISE_FRAME_COUNT).collect();
            numbers.shuffle(rng);
            numbers
                .into_iter()
                .take(length)
                .map(|n| format!("{IMAGE_LOCATION}noise_{n}{IMAGE_FILE_EXTENSION}"))
                .collect()
        }
        ImageSequenceType::Grating(_) => {
            let code = kind.code();
            if start_level.min(end_level) < 1 {
                warn!(
                    start_level,
                    end_level, "grating sequence requested below the lowest stimulus level"
                );
            }
            ramp(start_level, end_level, length)
                .map(|level| {
                    format!("{IMAGE_LOCATION}stim_{code}_vis_{level}{IMAGE_FILE_EXTENSION}")
                })
                .collect()
        }
    }
}

fn ramp(start: i32, end: i32, length: usize) -> impl Iterator<Item = i32> {
    let step = if length > 1 {
        f64::from(end - start) / (length - 1) as f64
    } else {
        0.0
    };
    (0..length).map(move |i| (f64::from(start) + step * i as f64 + 0.5).floor() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::Orientation;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn grating_ramp_hits_both_ends() {
        let mut rng = StdRng::seed_from_u64(1);
        let frames = generate_image_sequence(
            &mut rng,
            1,
            46,
            20,
            ImageSequenceType::Grating(Orientation::LeftTilted),
        );
        assert_eq!(frames.len(), 20);
        assert_eq!(frames[0], "../media/images/stim_1_vis_1.png");
        assert_eq!(frames[19], "../media/images/stim_1_vis_46.png");
        // 1 + 45/19 = 3.368...
        assert_eq!(frames[1], "../media/images/stim_1_vis_3.png");
    }

    #[test]
    fn grating_levels_never_decrease() {
        let levels: Vec<i32> = ramp(1, 37, 20).collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn degenerate_lengths() {
        let mut rng = StdRng::seed_from_u64(1);
        let kind = ImageSequenceType::Grating(Orientation::RightTilted);
        assert!(generate_image_sequence(&mut rng, 1, 46, 0, kind).is_empty());
        assert_eq!(
            generate_image_sequence(&mut rng, 5, 46, 1, kind),
            vec!["../media/images/stim_2_vis_5.png".to_string()]
        );
    }

    #[test]
    fn levels_below_one_are_emitted_as_is() {
        let mut rng = StdRng::seed_from_u64(1);
        let frames = generate_image_sequence(
            &mut rng,
            1,
            -11,
            20,
            ImageSequenceType::Grating(Orientation::LeftTilted),
        );
        assert_eq!(frames[0], "../media/images/stim_1_vis_1.png");
        assert_eq!(frames[19], "../media/images/stim_1_vis_-11.png");
    }

    #[test]
    fn noise_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        let frames = generate_image_sequence(&mut rng, 1, 1, 20, ImageSequenceType::Noise);
        let unique: HashSet<_> = frames.iter().collect();
        assert_eq!(unique.len(), 20);
        assert!(frames.iter().all(|f| f.starts_with("../media/images/noise_")));
    }

    #[test]
    fn noise_order_depends_on_seed_only() {
        let a = generate_image_sequence(&mut StdRng::seed_from_u64(9), 1, 1, 20, ImageSequenceType::Noise);
        let b = generate_image_sequence(&mut StdRng::seed_from_u64(9), 1, 1, 20, ImageSequenceType::Noise);
        assert_eq!(a, b);
    }
}
