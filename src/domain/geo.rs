// Brazilian geography domain model - federative units and regions
use std::fmt;

/// A federative unit (state or federal district), keyed by its IBGE code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uf {
    pub code: u8,
    pub abbreviation: &'static str,
    pub name: &'static str,
}

/// The five macro-regions. Ordering here matters: the water dashboard walks
/// UFs region by region in this exact order when laying out marker positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    North,
    Northeast,
    Southeast,
    South,
    MidWest,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::Northeast,
        Region::Southeast,
        Region::South,
        Region::MidWest,
    ];

    /// Derive the region from a UF code: the leading digit is the region
    /// number (11..17 North, 21..29 Northeast, 31..35 Southeast, 41..43
    /// South, 50..53 Mid-West).
    pub fn from_uf_code(code: u8) -> Option<Region> {
        match code / 10 {
            1 => Some(Region::North),
            2 => Some(Region::Northeast),
            3 => Some(Region::Southeast),
            4 => Some(Region::South),
            5 => Some(Region::MidWest),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::Northeast => "Northeast",
            Region::Southeast => "Southeast",
            Region::South => "South",
            Region::MidWest => "Mid-West",
        }
    }

    /// Fixed palette color for the region (the Plotly default cycle the
    /// dashboards standardized on).
    pub fn color(&self) -> &'static str {
        match self {
            Region::North => "#636FFA",
            Region::Northeast => "#EF553B",
            Region::Southeast => "#00CC96",
            Region::South => "#AB63FA",
            Region::MidWest => "#FFA15A",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// All 27 federative units in ascending IBGE-code order, which is also
/// region order (North first, Mid-West last).
pub const ALL_UFS: [Uf; 27] = [
    Uf { code: 11, abbreviation: "RO", name: "Rondônia" },
    Uf { code: 12, abbreviation: "AC", name: "Acre" },
    Uf { code: 13, abbreviation: "AM", name: "Amazonas" },
    Uf { code: 14, abbreviation: "RR", name: "Roraima" },
    Uf { code: 15, abbreviation: "PA", name: "Pará" },
    Uf { code: 16, abbreviation: "AP", name: "Amapá" },
    Uf { code: 17, abbreviation: "TO", name: "Tocantins" },
    Uf { code: 21, abbreviation: "MA", name: "Maranhão" },
    Uf { code: 22, abbreviation: "PI", name: "Piauí" },
    Uf { code: 23, abbreviation: "CE", name: "Ceará" },
    Uf { code: 24, abbreviation: "RN", name: "Rio Grande do Norte" },
    Uf { code: 25, abbreviation: "PB", name: "Paraíba" },
    Uf { code: 26, abbreviation: "PE", name: "Pernambuco" },
    Uf { code: 27, abbreviation: "AL", name: "Alagoas" },
    Uf { code: 28, abbreviation: "SE", name: "Sergipe" },
    Uf { code: 29, abbreviation: "BA", name: "Bahia" },
    Uf { code: 31, abbreviation: "MG", name: "Minas Gerais" },
    Uf { code: 32, abbreviation: "ES", name: "Espírito Santo" },
    Uf { code: 33, abbreviation: "RJ", name: "Rio de Janeiro" },
    Uf { code: 35, abbreviation: "SP", name: "São Paulo" },
    Uf { code: 41, abbreviation: "PR", name: "Paraná" },
    Uf { code: 42, abbreviation: "SC", name: "Santa Catarina" },
    Uf { code: 43, abbreviation: "RS", name: "Rio Grande do Sul" },
    Uf { code: 50, abbreviation: "MS", name: "Mato Grosso do Sul" },
    Uf { code: 51, abbreviation: "MT", name: "Mato Grosso" },
    Uf { code: 52, abbreviation: "GO", name: "Goiás" },
    Uf { code: 53, abbreviation: "DF", name: "Distrito Federal" },
];

impl Uf {
    pub fn from_code(code: u8) -> Option<&'static Uf> {
        ALL_UFS.iter().find(|uf| uf.code == code)
    }

    pub fn from_abbreviation(abbr: &str) -> Option<&'static Uf> {
        ALL_UFS.iter().find(|uf| uf.abbreviation == abbr)
    }

    pub fn region(&self) -> Region {
        // Every code in ALL_UFS has a valid leading digit.
        Region::from_uf_code(self.code).unwrap_or(Region::North)
    }

    /// UFs of one region, in table (IBGE-code) order.
    pub fn in_region(region: Region) -> impl Iterator<Item = &'static Uf> {
        ALL_UFS.iter().filter(move |uf| uf.region() == region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_code() {
        assert_eq!(Region::from_uf_code(11), Some(Region::North));
        assert_eq!(Region::from_uf_code(29), Some(Region::Northeast));
        assert_eq!(Region::from_uf_code(35), Some(Region::Southeast));
        assert_eq!(Region::from_uf_code(43), Some(Region::South));
        assert_eq!(Region::from_uf_code(53), Some(Region::MidWest));
        assert_eq!(Region::from_uf_code(60), None);
    }

    #[test]
    fn test_lookup() {
        let sp = Uf::from_abbreviation("SP").unwrap();
        assert_eq!(sp.code, 35);
        assert_eq!(sp.name, "São Paulo");
        assert_eq!(sp.region(), Region::Southeast);

        assert!(Uf::from_code(34).is_none());
        assert!(Uf::from_abbreviation("XX").is_none());
    }

    #[test]
    fn test_region_sizes() {
        let counts: Vec<usize> = Region::ALL
            .iter()
            .map(|r| Uf::in_region(*r).count())
            .collect();
        assert_eq!(counts, vec![7, 9, 4, 3, 4]);
    }
}
