//! Point geometries and GeoSPARQL literals
//!
//! Coordinates arrive as decimal latitude/longitude under a named geodetic
//! datum. Numeric reprojection is an external concern: it sits behind the
//! [`Reprojector`] trait and every failure it reports is wrapped in
//! [`GeometryError`], so callers never see the underlying library's errors.

use std::fmt;

use geo_types::Point;
use surveygraph_ir::{Datatype, Term};
use thiserror::Error;

/// Errors from building or reprojecting a geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    Longitude(f64),

    /// Failure reported by the reprojection service
    #[error("Cannot reproject from {from} to {to}: {source}")]
    Reprojection {
        from: String,
        to: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A point in a named coordinate reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// x is longitude, y is latitude
    pub point: Point<f64>,
    /// CRS IRI
    pub datum: String,
}

impl Geometry {
    /// Build from decimal degrees, rejecting out-of-range values.
    pub fn from_lat_lon(
        latitude: f64,
        longitude: f64,
        datum: impl Into<String>,
    ) -> Result<Self, GeometryError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeometryError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeometryError::Longitude(longitude));
        }
        Ok(Self {
            point: Point::new(longitude, latitude),
            datum: datum.into(),
        })
    }

    pub fn latitude(&self) -> f64 {
        self.point.y()
    }

    pub fn longitude(&self) -> f64 {
        self.point.x()
    }

    /// Lexical form of the `geo:wktLiteral`: `<crs> POINT (lon lat)`.
    pub fn to_wkt(&self) -> String {
        self.to_string()
    }

    pub fn to_term(&self) -> Term {
        Term::typed(self.to_wkt(), Datatype::wkt_literal())
    }

    /// Reproject into `target` through `service`.
    pub fn transform_to(
        &self,
        target: &str,
        service: &dyn Reprojector,
    ) -> Result<Geometry, GeometryError> {
        if self.datum == target {
            return Ok(self.clone());
        }
        let point = service
            .reproject(self.point, &self.datum, target)
            .map_err(|source| GeometryError::Reprojection {
                from: self.datum.clone(),
                to: target.to_string(),
                source,
            })?;
        Ok(Geometry {
            point,
            datum: target.to_string(),
        })
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}> POINT ({} {})",
            self.datum,
            self.point.x(),
            self.point.y()
        )
    }
}

/// External coordinate transformation service.
pub trait Reprojector: Send + Sync {
    fn reproject(
        &self,
        point: Point<f64>,
        from: &str,
        to: &str,
    ) -> Result<Point<f64>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Passes points through unchanged and refuses any real transformation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReprojection;

impl Reprojector for NoReprojection {
    fn reproject(
        &self,
        point: Point<f64>,
        from: &str,
        to: &str,
    ) -> Result<Point<f64>, Box<dyn std::error::Error + Send + Sync>> {
        if from == to {
            Ok(point)
        } else {
            Err("no reprojection service configured".into())
        }
    }
}
