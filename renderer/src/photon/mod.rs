use crate::color::Rgb;
use crate::kdtree::{KdPoint, PointKdTree};
use crate::RenderResult;
use cgmath::{InnerSpace, Point3, Vector3};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// A single recorded photon: the point it landed on, the direction it
/// arrived from, and the power it carries after every bounce up to that
/// point.
#[derive(Debug, Clone, Copy)]
pub struct Photon {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub power: Rgb,
}

impl Photon {
    pub fn new(position: Point3<f32>, direction: Vector3<f32>, power: Rgb) -> Self {
        Self { position, direction, power }
    }
}

impl KdPoint for Photon {
    fn position(&self) -> Point3<f32> {
        self.position
    }
}

/// A photon, together with its squared distance from the point a gather
/// query was issued against, as handed to the query's callback.
pub struct FoundPhoton<'a> {
    pub photon: &'a Photon,
    pub distance_squared: f32,
}

/// Binary format version tag written to the header of saved photon maps;
/// bumped whenever the record layout below changes.
const FILE_VERSION: u32 = 1;
const FILE_MAGIC: &[u8; 4] = b"PRPM";

/// A collection of photons shot during the photon prepass, queryable by
/// nearest-neighbor gather once `build` has been called. Caustic and
/// diffuse (global) photons each get their own map.
pub struct PhotonMap {
    name: String,
    num_paths: usize,
    photons: Vec<Photon>,
    tree: Option<PointKdTree<Photon>>,
}

impl PhotonMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), num_paths: 0, photons: Vec::new(), tree: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_num_paths(&mut self, n: usize) {
        self.num_paths = n;
    }

    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    pub fn num_photons(&self) -> usize {
        self.photons.len()
    }

    pub fn push(&mut self, photon: Photon) {
        self.photons.push(photon);
        self.tree = None;
    }

    pub fn append(&mut self, mut photons: Vec<Photon>, paths: usize) {
        self.photons.append(&mut photons);
        self.num_paths += paths;
        self.tree = None;
    }

    pub fn reserve(&mut self, additional: usize) {
        self.photons.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.photons.clear();
        self.num_paths = 0;
        self.tree = None;
    }

    pub fn is_ready(&self) -> bool {
        self.tree.is_some()
    }

    /// Build the k-d tree backing `gather`/`find_nearest`. Must be called
    /// once all photons for this map have been pushed/appended.
    pub fn build(&mut self) {
        let photons = std::mem::take(&mut self.photons);
        self.tree = Some(PointKdTree::build(photons));
    }

    /// Gather up to `k` photons within `sq_radius` of `p`, shrinking
    /// `sq_radius` to the farthest of the `k` nearest found so subsequent
    /// lookups in dense regions stay bounded.
    pub fn gather(&self, p: Point3<f32>, k: usize, sq_radius: &mut f32) -> Vec<FoundPhoton> {
        let tree = match &self.tree {
            Some(t) => t,
            None => return Vec::new(),
        };
        let mut found: Vec<FoundPhoton> = Vec::with_capacity(k);
        tree.lookup(p, sq_radius, |photon, d2, max_d2| {
            if found.len() < k {
                found.push(FoundPhoton { photon, distance_squared: d2 });
                if found.len() == k {
                    found.sort_by(|a, b| a.distance_squared.partial_cmp(&b.distance_squared).unwrap());
                    *max_d2 = found.last().unwrap().distance_squared;
                }
            } else {
                let worst = found.len() - 1;
                if d2 < found[worst].distance_squared {
                    found[worst] = FoundPhoton { photon, distance_squared: d2 };
                    found.sort_by(|a, b| a.distance_squared.partial_cmp(&b.distance_squared).unwrap());
                    *max_d2 = found.last().unwrap().distance_squared;
                }
            }
        });
        found
    }

    /// The single nearest photon to `p` whose direction is on the same
    /// side of the surface as `normal`, used for final-gather shortcuts.
    pub fn find_nearest(&self, p: Point3<f32>, normal: Vector3<f32>, max_dist: f32) -> Option<&Photon> {
        let tree = self.tree.as_ref()?;
        let mut sq_radius = max_dist * max_dist;
        let mut nearest: Option<(&Photon, f32)> = None;
        tree.lookup(p, &mut sq_radius, |photon, d2, _| {
            if photon.direction.dot(normal) > 0.0 {
                if nearest.map_or(true, |(_, best)| d2 < best) {
                    nearest = Some((photon, d2));
                }
            }
        });
        nearest.map(|(p, _)| p)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        w.write_all(FILE_MAGIC)?;
        w.write_all(&FILE_VERSION.to_le_bytes())?;
        w.write_all(&(self.num_paths as u64).to_le_bytes())?;
        w.write_all(&(self.photons.len() as u64).to_le_bytes())?;
        for photon in &self.photons {
            w.write_all(&photon.position.x.to_le_bytes())?;
            w.write_all(&photon.position.y.to_le_bytes())?;
            w.write_all(&photon.position.z.to_le_bytes())?;
            w.write_all(&photon.direction.x.to_le_bytes())?;
            w.write_all(&photon.direction.y.to_le_bytes())?;
            w.write_all(&photon.direction.z.to_le_bytes())?;
            w.write_all(&photon.power.r().to_le_bytes())?;
            w.write_all(&photon.power.g().to_le_bytes())?;
            w.write_all(&photon.power.b().to_le_bytes())?;
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let file = File::open(path)?;
        let mut r = BufReader::new(file);

        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        let mut version_bytes = [0u8; 4];
        r.read_exact(&mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);
        if &magic != FILE_MAGIC || version != FILE_VERSION {
            return Err(crate::RenderError::PhotonMapVersionMismatch { found: version, expected: FILE_VERSION });
        }

        let mut u64_buf = [0u8; 8];
        r.read_exact(&mut u64_buf)?;
        let num_paths = u64::from_le_bytes(u64_buf) as usize;
        r.read_exact(&mut u64_buf)?;
        let num_photons = u64::from_le_bytes(u64_buf) as usize;

        let mut photons = Vec::with_capacity(num_photons);
        let mut f32_buf = [0u8; 4];
        let mut read_f32 = |r: &mut BufReader<File>| -> RenderResult<f32> {
            r.read_exact(&mut f32_buf)?;
            Ok(f32::from_le_bytes(f32_buf))
        };
        for _ in 0..num_photons {
            let position = Point3::new(read_f32(&mut r)?, read_f32(&mut r)?, read_f32(&mut r)?);
            let direction = Vector3::new(read_f32(&mut r)?, read_f32(&mut r)?, read_f32(&mut r)?);
            let power = Rgb::from_rgb(read_f32(&mut r)?, read_f32(&mut r)?, read_f32(&mut r)?);
            photons.push(Photon::new(position, direction, power));
        }

        Ok(Self { name: String::new(), num_paths, photons, tree: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gather_returns_nearest_k() {
        let mut map = PhotonMap::new("diffuse");
        for x in 0..20 {
            map.push(Photon::new(
                Point3::new(x as f32, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
                Rgb::constant(1.0),
            ));
        }
        map.build();
        let mut sq_radius = 100.0;
        let found = map.gather(Point3::new(10.0, 0.0, 0.0), 4, &mut sq_radius);
        assert_eq!(found.len(), 4);
        assert!(found.iter().all(|f| f.distance_squared <= 4.0));
    }
}
