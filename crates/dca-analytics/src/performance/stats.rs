//! 표본 통계 헬퍼.
//!
//! 지표 계산은 표본 표준편차(n-1)를, 시나리오 집계는 모표준편차(n)를 사용합니다.
//! 왜도와 첨도는 표본 보정값입니다.

/// 산술 평균. 비어 있으면 `None`.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 표본 표준편차 (자유도 n-1). 값이 2개 미만이면 `None`.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// 모표준편차 (자유도 n). 비어 있으면 `None`.
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// 선형 보간 백분위수 (`p`는 0~100).
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * weight)
}

/// 1차 차분 (`x[i] - x[i-1]`).
pub fn diff(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// 평균 편차의 거듭제곱 합 (Σd², Σd³, Σd⁴).
fn central_sums(values: &[f64]) -> Option<(f64, f64, f64)> {
    let m = mean(values)?;
    Some(values.iter().fold((0.0, 0.0, 0.0), |(s2, s3, s4), v| {
        let d = v - m;
        let d2 = d * d;
        (s2 + d2, s3 + d2 * d, s4 + d2 * d2)
    }))
}

/// 표본 왜도 (adjusted Fisher-Pearson). 값이 3개 미만이거나 분산이 0이면 0.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    match central_sums(values) {
        Some((s2, s3, _)) if values.len() >= 3 && s2 > 0.0 => {
            let g1 = (s3 / n) / (s2 / n).powf(1.5);
            g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
        }
        _ => 0.0,
    }
}

/// 표본 초과 첨도 (불편 추정). 값이 4개 미만이거나 분산이 0이면 0.
pub fn excess_kurtosis(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    match central_sums(values) {
        Some((s2, _, s4)) if values.len() >= 4 && s2 > 0.0 => {
            let denom = (n - 2.0) * (n - 3.0);
            (n + 1.0) * n * (n - 1.0) / denom * s4 / (s2 * s2) - 3.0 * (n - 1.0).powi(2) / denom
        }
        _ => 0.0,
    }
}

/// 조건을 만족하는 값이 연속으로 나온 최대 횟수.
pub fn max_consecutive(values: &[f64], pred: impl Fn(f64) -> bool) -> usize {
    values
        .iter()
        .fold((0usize, 0usize), |(best, run), v| {
            let run = if pred(*v) { run + 1 } else { 0 };
            (best.max(run), run)
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values).unwrap() - 5.0).abs() < EPS);
        assert!((population_std(&values).unwrap() - 2.0).abs() < EPS);
        assert!((sample_std(&values).unwrap() - (32.0f64 / 7.0).sqrt()).abs() < EPS);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(mean(&[]).is_none());
        assert!(sample_std(&[1.0]).is_none());
        assert_eq!(population_std(&[3.0]), Some(0.0));
        assert!(percentile(&[], 50.0).is_none());
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert!((percentile(&values, 50.0).unwrap() - 2.5).abs() < EPS);
        assert!((percentile(&values, 0.0).unwrap() - 1.0).abs() < EPS);
        assert!((percentile(&values, 100.0).unwrap() - 4.0).abs() < EPS);
        assert!((percentile(&values, 25.0).unwrap() - 1.75).abs() < EPS);
    }

    #[test]
    fn test_skewness_and_kurtosis() {
        let values = [1.0, 2.0, 3.0, 4.0, 10.0];
        assert!((skewness(&values) - 1.2 * 2.0f64.sqrt()).abs() < 1e-9);
        assert!((excess_kurtosis(&values) - 3.152).abs() < 1e-9);

        assert!(skewness(&[1.0, 2.0, 3.0]).abs() < EPS);
        assert_eq!(skewness(&[1.0, 2.0]), 0.0);
        assert_eq!(excess_kurtosis(&[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(excess_kurtosis(&[5.0; 6]), 0.0);
    }

    #[test]
    fn test_max_consecutive() {
        let values = [0.1, 0.2, -0.1, 0.3, 0.1, 0.2, 0.0, -0.2, -0.1];
        assert_eq!(max_consecutive(&values, |v| v > 0.0), 3);
        assert_eq!(max_consecutive(&values, |v| v < 0.0), 2);
        assert_eq!(max_consecutive(&[], |v| v > 0.0), 0);
    }

    #[test]
    fn test_diff() {
        assert_eq!(diff(&[1.0, 3.0, 2.0]), vec![2.0, -1.0]);
        assert!(diff(&[1.0]).is_empty());
    }
}
