mod cli;

use std::process::ExitCode;

use clap::Parser;
use drug_gateway::{AdvancedSearch, ClassifiedError, DrugDatabaseClient, NameSearch, SymptomSearch};
use serde::Serialize;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Command};

fn init_tracing() {
    let log_format = std::env::var("DRUG_DB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays pure JSON
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    // Loads .env before the log format is read
    let client = DrugDatabaseClient::from_env()?;
    init_tracing();

    let retry = client.retry_policy();
    tracing::debug!(
        max_attempts = retry.max_attempts(),
        base_delay_ms = retry.base_delay().as_millis() as u64,
        "drug database client ready"
    );

    match run(&client, cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => match error.downcast::<ClassifiedError>() {
            Ok(classified) => {
                eprintln!("{}", serde_json::to_string_pretty(&classified)?);
                Ok(ExitCode::FAILURE)
            }
            Err(other) => Err(other),
        },
    }
}

async fn run(client: &DrugDatabaseClient, command: Command) -> anyhow::Result<String> {
    let output = match command {
        Command::Autocomplete { query } => render(client.autocomplete(&query).await?)?,
        Command::SearchName { query, paging } => {
            let mut search = NameSearch::new(query)
                .with_page(paging.page)
                .with_prescription(paging.prescription.into());
            if let Some(size) = paging.page_size {
                search = search.with_page_size(size);
            }
            render(client.search_by_name(search).await?)?
        }
        Command::SearchSymptom {
            primary,
            secondary,
            paging,
        } => {
            let mut search = SymptomSearch::new(primary, secondary)
                .with_page(paging.page)
                .with_prescription(paging.prescription.into());
            if let Some(size) = paging.page_size {
                search = search.with_page_size(size);
            }
            render(client.search_by_symptom(search).await?)?
        }
        Command::SearchAdvanced {
            atc,
            route,
            package,
            paging,
        } => {
            let search = AdvancedSearch {
                atc_code: atc,
                route,
                package,
                page: paging.page,
                page_size: paging.page_size,
                prescription: paging.prescription.into(),
            };
            render(client.advanced_search(search).await?)?
        }
        Command::Detail {
            registration_number,
        } => render(client.get_drug(&registration_number).await?)?,
        Command::Symptoms => render(client.symptom_hierarchy().await?)?,
        Command::Popular { rows } => render(client.popular_symptoms(rows).await?)?,
        Command::AtcGroups => render(client.atc_groups().await?)?,
        Command::Packages => render(client.package_types().await?)?,
        Command::Routes => render(client.administration_routes().await?)?,
        Command::ImageUrl { image_id } => client.image_url(&image_id),
    };
    Ok(output)
}

fn render<T: Serialize>(value: T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use drug_gateway::GatewayConfig;

    #[test]
    fn test_render_reports_serialization_failure() {
        let mut by_pair = HashMap::new();
        by_pair.insert((1u8, 2u8), "not a JSON object key");
        assert!(render(by_pair).is_err());

        assert_eq!(render(vec![1, 2]).unwrap(), "[\n  1,\n  2\n]");
    }

    #[tokio::test]
    async fn test_invalid_input_surfaces_as_classified_error() {
        let config = GatewayConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..GatewayConfig::default()
        };
        let client = DrugDatabaseClient::new(&config).unwrap();

        let error = run(
            &client,
            Command::Detail {
                registration_number: "02016 20534 00".into(),
            },
        )
        .await
        .unwrap_err();
        let classified = error.downcast::<ClassifiedError>().unwrap();
        assert!(classified.is_invalid_input());
    }

    #[tokio::test]
    async fn test_image_url_needs_no_network() {
        let config = GatewayConfig {
            images_base_url: "https://img.drugs.test".into(),
            ..GatewayConfig::default()
        };
        let client = DrugDatabaseClient::new(&config).unwrap();

        let output = run(
            &client,
            Command::ImageUrl {
                image_id: "abc.jpg".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(output, "https://img.drugs.test/abc.jpg");
    }
}
