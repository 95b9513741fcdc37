// TransferView -- Smooth crop-to-fit image transitions built with Rust and GTK4
//
// Copyright (c) 2024-2025 Martin van der Werff <github (at) newinnovations.nl>
//
// This file is part of TransferView.
//
// TransferView is free software: you can redistribute it and/or modify it under the terms of
// the GNU Affero General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR
// IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND
// FITNESS FOR A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR ANY
// DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
// LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR
// BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT,
// STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Timing curve applied to the linear progress delivered by the time driver.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    /// Slow start and end, fastest in the middle: `cos((t + 1)π) / 2 + 0.5`
    #[default]
    AccelerateDecelerate,
}

impl Easing {
    /// Evaluate the curve at `t`. Input is clamped to [0, 1] and both end
    /// points map exactly onto 0 and 1.
    pub fn evaluate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_points() {
        for easing in [Easing::Linear, Easing::AccelerateDecelerate] {
            assert_eq!(easing.evaluate(0.0), 0.0);
            assert_eq!(easing.evaluate(1.0), 1.0);
            assert_eq!(easing.evaluate(-0.5), 0.0);
            assert_eq!(easing.evaluate(1.5), 1.0);
        }
    }

    #[test]
    fn test_accelerate_decelerate_shape() {
        let easing = Easing::AccelerateDecelerate;
        assert!((easing.evaluate(0.5) - 0.5).abs() < 1e-12);
        // slow start, slow end
        assert!(easing.evaluate(0.1) < 0.1);
        assert!(easing.evaluate(0.9) > 0.9);
        let mut previous = 0.0;
        for i in 1..=100 {
            let value = easing.evaluate(i as f64 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_linear() {
        assert_eq!(Easing::Linear.evaluate(0.25), 0.25);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Easing::AccelerateDecelerate).unwrap(),
            "\"accelerate-decelerate\""
        );
        let easing: Easing = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(easing, Easing::Linear);
    }
}
