//! Normalized cross-correlation template matching.
//!
//! Scores are the correlation coefficient between the template and each
//! same-sized window, with the mean removed per channel and all three
//! channels correlated jointly. Scores lie in `[-1, 1]`; a window or
//! template with no variance scores 0.

use image::{GenericImageView, Rgb};
use serde::Serialize;

use super::template::StairTemplate;

/// One template occurrence, in the coordinates of the searched image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Match {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub score: f32,
}

/// Correlation scores for every placement of the template.
#[derive(Debug, Clone)]
pub struct ScoreMap {
    pub width: u32,
    pub height: u32,
    scores: Vec<f32>,
}

impl ScoreMap {
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.scores[y as usize * self.width as usize + x as usize]
    }

    pub fn max(&self) -> Option<(u32, u32, f32)> {
        self.scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, &s)| ((i % self.width as usize) as u32, (i / self.width as usize) as u32, s))
    }
}

/// Scores every placement of `template` inside `image`.
///
/// Returns `None` when the template does not fit.
pub fn match_template<I>(image: &I, template: &StairTemplate) -> Option<ScoreMap>
where
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    let (img_w, img_h) = image.dimensions();
    let (tpl_w, tpl_h) = (template.width(), template.height());
    if tpl_w == 0 || tpl_h == 0 || tpl_w > img_w || tpl_h > img_h {
        return None;
    }

    let n = (tpl_w * tpl_h) as f64;

    // Zero-mean template per channel.
    let mut mean = [0f64; 3];
    for px in template.image().pixels() {
        for c in 0..3 {
            mean[c] += px[c] as f64;
        }
    }
    mean.iter_mut().for_each(|m| *m /= n);

    let centered: Vec<[f64; 3]> = template
        .image()
        .pixels()
        .map(|px| [px[0] as f64 - mean[0], px[1] as f64 - mean[1], px[2] as f64 - mean[2]])
        .collect();
    let tpl_energy: f64 = centered.iter().flat_map(|v| v.iter()).map(|v| v * v).sum();

    let out_w = img_w - tpl_w + 1;
    let out_h = img_h - tpl_h + 1;
    let mut scores = Vec::with_capacity((out_w * out_h) as usize);

    for oy in 0..out_h {
        for ox in 0..out_w {
            let mut cross = 0f64;
            let mut sum = [0f64; 3];
            let mut sum_sq = [0f64; 3];
            for ty in 0..tpl_h {
                for tx in 0..tpl_w {
                    let px = image.get_pixel(ox + tx, oy + ty);
                    let t = &centered[(ty * tpl_w + tx) as usize];
                    for c in 0..3 {
                        let v = px[c] as f64;
                        cross += t[c] * v;
                        sum[c] += v;
                        sum_sq[c] += v * v;
                    }
                }
            }
            let win_energy: f64 = (0..3).map(|c| sum_sq[c] - sum[c] * sum[c] / n).sum();
            let denom = (tpl_energy * win_energy).sqrt();
            let score = if denom > 1e-9 { cross / denom } else { 0.0 };
            scores.push(score as f32);
        }
    }

    Some(ScoreMap {
        width: out_w,
        height: out_h,
        scores,
    })
}

/// Every placement scoring at least `threshold`, in row-major order.
///
/// Overlapping hits around one occurrence are all reported.
pub fn find_matches<I>(image: &I, template: &StairTemplate, threshold: f32) -> Vec<Match>
where
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    let Some(map) = match_template(image, template) else {
        return Vec::new();
    };

    if let Some((x, y, score)) = map.max() {
        crate::log(&format!("Best template score {:.3} at ({}, {})", score, x, y));
    }

    let mut matches = Vec::new();
    for y in 0..map.height {
        for x in 0..map.width {
            let score = map.get(x, y);
            if score >= threshold {
                matches.push(Match {
                    x,
                    y,
                    width: template.width(),
                    height: template.height(),
                    score,
                });
            }
        }
    }
    matches
}
