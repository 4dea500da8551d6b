// Foveation geometry
//
// The server models foveation as a full-resolution center rectangle plus an
// edge downscale ratio. Layers map onto that model as: first layer = center,
// second = mid, last = peripheral, with fixed fallbacks for missing layers.

use crate::config::FieldOfViewConfig;
use crate::settings::FoveationLayer;

pub const DEFAULT_CENTER_LAYER: FoveationLayer = FoveationLayer::new(1.0, 20.0, 5.0);
pub const DEFAULT_MID_LAYER: FoveationLayer = FoveationLayer::new(0.5, 40.0, 10.0);
pub const DEFAULT_PERIPHERAL_LAYER: FoveationLayer = FoveationLayer::new(0.25, 0.0, 0.0);

/// Lowest peripheral quality considered when deriving the edge ratio
const MIN_EDGE_QUALITY: f32 = 0.1;

/// Center, mid and peripheral layers resolved from a layer list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoveationGeometry {
    pub center: FoveationLayer,
    pub mid: FoveationLayer,
    pub peripheral: FoveationLayer,
}

impl FoveationGeometry {
    /// Resolve layers, substituting defaults for missing positions
    ///
    /// A single layer serves as both center and peripheral.
    pub fn resolve(layers: &[FoveationLayer]) -> Self {
        Self {
            center: layers.first().copied().unwrap_or(DEFAULT_CENTER_LAYER),
            mid: layers.get(1).copied().unwrap_or(DEFAULT_MID_LAYER),
            peripheral: layers.last().copied().unwrap_or(DEFAULT_PERIPHERAL_LAYER),
        }
    }

    /// Copy with every quality factor scaled by the strength multiplier
    pub fn scaled(self, multiplier: f32) -> Self {
        let scale = |layer: FoveationLayer| FoveationLayer {
            quality_factor: layer.quality_factor * multiplier,
            ..layer
        };
        Self {
            center: scale(self.center),
            mid: scale(self.mid),
            peripheral: scale(self.peripheral),
        }
    }

    /// Normalized full-resolution center size per axis
    pub fn center_size(&self, fov: &FieldOfViewConfig) -> (f32, f32) {
        let diameter = 2.0 * self.center.radius_degrees;
        (
            (diameter / fov.horizontal_degrees).min(1.0),
            (diameter / fov.vertical_degrees).min(1.0),
        )
    }

    /// Edge downscale ratio, identical on both axes
    pub fn edge_ratio(&self) -> f32 {
        1.0 / self.peripheral.quality_factor.max(MIN_EDGE_QUALITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_three_layers() {
        let layers = [
            FoveationLayer::new(1.0, 22.0, 7.0),
            FoveationLayer::new(0.55, 42.0, 10.0),
            FoveationLayer::new(0.20, 0.0, 0.0),
        ];
        let geometry = FoveationGeometry::resolve(&layers);
        assert_eq!(geometry.center, layers[0]);
        assert_eq!(geometry.mid, layers[1]);
        assert_eq!(geometry.peripheral, layers[2]);

        let (x, y) = geometry.center_size(&FieldOfViewConfig::default());
        assert!((x - 0.44).abs() < 1e-6);
        assert!((y - 0.44).abs() < 1e-6);
        assert!((geometry.edge_ratio() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_resolve_empty_uses_defaults() {
        let geometry = FoveationGeometry::resolve(&[]);
        assert_eq!(geometry.center, DEFAULT_CENTER_LAYER);
        assert_eq!(geometry.mid, DEFAULT_MID_LAYER);
        assert_eq!(geometry.peripheral, DEFAULT_PERIPHERAL_LAYER);
        assert!((geometry.edge_ratio() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_single_layer() {
        let only = FoveationLayer::new(0.8, 30.0, 0.0);
        let geometry = FoveationGeometry::resolve(&[only]);
        assert_eq!(geometry.center, only);
        assert_eq!(geometry.mid, DEFAULT_MID_LAYER);
        assert_eq!(geometry.peripheral, only);
    }

    #[test]
    fn test_center_size_saturates() {
        let geometry = FoveationGeometry::resolve(&[FoveationLayer::new(1.0, 80.0, 0.0)]);
        let fov = FieldOfViewConfig {
            horizontal_degrees: 100.0,
            vertical_degrees: 200.0,
        };
        let (x, y) = geometry.center_size(&fov);
        assert_eq!(x, 1.0);
        assert!((y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_scaled_edge_ratio_floor() {
        let geometry = FoveationGeometry::resolve(&[
            FoveationLayer::new(1.0, 20.0, 5.0),
            FoveationLayer::new(0.15, 0.0, 0.0),
        ]);
        // 0.15 * 0.5 = 0.075, floored at 0.1
        let scaled = geometry.scaled(0.5);
        assert!((scaled.peripheral.quality_factor - 0.075).abs() < 1e-6);
        assert!((scaled.edge_ratio() - 10.0).abs() < 1e-5);
        assert!((scaled.center.quality_factor - 0.5).abs() < 1e-6);
    }
}
