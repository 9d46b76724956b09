//! Satellite imagery published by the China National Satellite
//! Meteorological Center. Every image lives at a fixed URL that is
//! overwritten in place, so the plain HTTP provider covers them all.

use skypaper_core::sources::{HttpProvider, ProviderRegistry, WallpaperProvider};

const IMAGE_BASE: &str = "https://img.nsmc.org.cn/CLOUDIMAGE";

pub struct Satellite {
    pub name: &'static str,
    pub description: &'static str,
    pub path: &'static str,
}

pub const SATELLITES: &[Satellite] = &[
    Satellite {
        name: "fengyun-4b",
        description: "FY-4B AGRI true colour full disk",
        path: "FY4B/AGRI/GCLR/FY4B_DISK_GCLR.JPG",
    },
    Satellite {
        name: "fengyun-4a",
        description: "FY-4A multi-channel colour full disk",
        path: "FY4A/MTCC/FY4A_DISK.JPG",
    },
    Satellite {
        name: "fengyun-3d",
        description: "FY-3D MERSI global mosaic",
        path: "FY3D/MIPS/FY3D_MERSI_GLOBAL.jpg",
    },
    Satellite {
        name: "fengyun-2h",
        description: "FY-2H enhanced visible nominal disk",
        path: "FY2H/NOM/FY2H_ETV_NOM.jpg",
    },
    Satellite {
        name: "fengyun-2h-regional",
        description: "FY-2H enhanced visible global sector",
        path: "FY2H/GLL/FY2H_ETV_SEC_GLB.jpg",
    },
    Satellite {
        name: "geos",
        description: "Geostationary infrared global mosaic",
        path: "GEOS/MOS/IRX/PIC/GBAL/GEOS_IMAGR_GBAL_L2_MOS_IRX_GLL_YYYYMMDD_HHmm_10KM_MS.jpg",
    },
];

impl Satellite {
    pub fn url(&self) -> String {
        format!("{IMAGE_BASE}/{}", self.path)
    }

    pub fn provider(&self, client: reqwest::Client) -> Box<dyn WallpaperProvider> {
        Box::new(HttpProvider::new(self.name, self.url(), client))
    }
}

pub fn register(registry: &mut ProviderRegistry) {
    for satellite in SATELLITES {
        registry.register(satellite.name, satellite.description, move |client| {
            satellite.provider(client)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_satellites() {
        let mut registry = ProviderRegistry::new();
        register(&mut registry);
        assert_eq!(
            registry.names(),
            vec![
                "fengyun-2h",
                "fengyun-2h-regional",
                "fengyun-3d",
                "fengyun-4a",
                "fengyun-4b",
                "geos",
            ]
        );
    }

    #[test]
    fn test_provider_endpoint() {
        let mut registry = ProviderRegistry::new();
        register(&mut registry);
        let provider = registry.create("fengyun-4b", reqwest::Client::new()).unwrap();
        assert_eq!(provider.name(), "fengyun-4b");
        assert_eq!(
            provider.state().endpoint(),
            "https://img.nsmc.org.cn/CLOUDIMAGE/FY4B/AGRI/GCLR/FY4B_DISK_GCLR.JPG"
        );
    }

    #[test]
    fn test_default_name_uses_image_file() {
        let provider = SATELLITES[1].provider(reqwest::Client::new());
        let name = provider.derive_filename();
        assert!(name.ends_with("_FY4A_DISK.JPG"), "{name}");
    }
}
