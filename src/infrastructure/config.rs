use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
    #[serde(default)]
    pub immunization: ImmunizationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Axis pinning for the immunization dashboard. Off by default; transitions
/// are only animated when both axes are pinned.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ImmunizationSettings {
    #[serde(default)]
    pub lock_x_axis: bool,
    #[serde(default)]
    pub lock_y_axis: bool,
}

/// File paths of every dataset, grouped by dashboard. Paths are resolved
/// relative to the working directory, like the config files themselves.
#[derive(Debug, Deserialize, Clone)]
pub struct DatasetsConfig {
    pub prenatal: PrenatalPaths,
    pub immunization: ImmunizationPaths,
    pub mortality_profile: MortalityProfilePaths,
    pub delivery: DeliveryPaths,
    pub water: WaterPaths,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PrenatalPaths {
    pub first_trimester_csv: String,
    pub vaccination_csv: String,
    pub mortality_csv: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImmunizationPaths {
    pub coverage_csv: String,
    pub mortality_csv: String,
    pub appointments_csv: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MortalityProfilePaths {
    pub causes_csv: String,
    pub gdp_csv: String,
    pub hdi_csv: String,
    pub mortality_csv: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryPaths {
    pub workbook_xlsx: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WaterPaths {
    pub supply_csv: String,
    pub mortality_csv: String,
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/settings"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_datasets_config() -> anyhow::Result<DatasetsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/datasets"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasets_config_shape() {
        let toml = r#"
            [prenatal]
            first_trimester_csv = "data/PropGestantePreNatal1trim.csv"
            vaccination_csv = "data/PropGestantesVacina.csv"
            mortality_csv = "data/RegiaoSaude_TxMortalidadeNeonatal.csv"

            [immunization]
            coverage_csv = "data/imunizacoes.csv"
            mortality_csv = "data/mortalidade_uf.csv"
            appointments_csv = "data/consultas.csv"

            [mortality_profile]
            causes_csv = "data/doencas_en.csv"
            gdp_csv = "data/pib.csv"
            hdi_csv = "data/idh.csv"
            mortality_csv = "data/mortes.csv"

            [delivery]
            workbook_xlsx = "data/dados.xlsx"

            [water]
            supply_csv = "data/agua.csv"
            mortality_csv = "data/mortalidade_agua.csv"
        "#;

        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        let cfg: DatasetsConfig = settings.try_deserialize().unwrap();

        assert_eq!(cfg.delivery.workbook_xlsx, "data/dados.xlsx");
        assert_eq!(cfg.water.supply_csv, "data/agua.csv");
    }

    #[test]
    fn test_server_config_shape() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
        "#;

        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        let cfg: ServerConfig = settings.try_deserialize().unwrap();

        assert_eq!(cfg.server.port, 8080);
        // axis locks default to off when the section is absent
        assert!(!cfg.immunization.lock_x_axis);
        assert!(!cfg.immunization.lock_y_axis);
    }

    #[test]
    fn test_axis_lock_settings() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [immunization]
            lock_x_axis = true
            lock_y_axis = true
        "#;

        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        let cfg: ServerConfig = settings.try_deserialize().unwrap();

        assert!(cfg.immunization.lock_x_axis);
        assert!(cfg.immunization.lock_y_axis);
    }
}
