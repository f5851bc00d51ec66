//! Network description assembly
//!
//! Walks the resolved station set and builds the structured description
//! records consumed by an external document formatter: one component entry
//! per station (identity, validity interval, location, outputs) plus the
//! network-level identification, classification, and contact blocks derived
//! from global dataset attributes.
//!
//! Assembly never aborts for a missing attribute: every required value that
//! cannot be found is substituted with the missing-attribute sentinel and
//! assembly continues. Single-station and multi-station datasets follow the
//! same per-station logic; they differ only in the scope of the title prefix
//! given to output entries.

use crate::app::models::{
    Contact, DatasetShape, NetworkDescription, SmlClassifier, SmlIdentifier, Station,
    StationDescription, StationLocation, VariableOutput,
};
use crate::app::services::catalog::{DatasetMetadata, StationCatalog, Vocabulary};
use crate::app::services::network::StationNetwork;
use crate::constants::{ATTRIBUTE_MISSING, INSTITUTION, LONG_NAME, NETWORK_ALL, STANDARD_NAME, UNITS, WMO_CODE};
use std::collections::BTreeMap;
use tracing::debug;

/// Builds per-station and network-level description records
pub struct NetworkDescriptionAssembler<'a, C, M>
where
    C: StationCatalog + ?Sized,
    M: DatasetMetadata + Vocabulary + ?Sized,
{
    network: &'a StationNetwork<'a, C>,
    metadata: &'a M,
    procedure: String,
}

impl<'a, C, M> NetworkDescriptionAssembler<'a, C, M>
where
    C: StationCatalog + ?Sized,
    M: DatasetMetadata + Vocabulary + ?Sized,
{
    pub fn new(
        network: &'a StationNetwork<'a, C>,
        metadata: &'a M,
        procedure: impl Into<String>,
    ) -> Self {
        Self {
            network,
            metadata,
            procedure: procedure.into(),
        }
    }

    /// Assemble the full network description
    pub fn assemble(&self) -> NetworkDescription {
        let components = self.station_descriptions();
        debug!(
            stations = components.len(),
            procedure = self.procedure.as_str(),
            "network description assembled"
        );

        NetworkDescription {
            name: NETWORK_ALL.to_string(),
            description: self
                .metadata
                .global_attribute("title")
                .unwrap_or("No description found")
                .to_string(),
            identifiers: self.identification(),
            classifiers: self.classification(),
            contacts: vec![self.contact("operator", "creator"), self.contact("publisher", "publisher")],
            valid_time_begin: self.network.bound_time_begin(),
            valid_time_end: self.network.bound_time_end(),
            lower_corner: self.network.bound_lower_corner(),
            upper_corner: self.network.bound_upper_corner(),
            components,
        }
    }

    /// One description entry per resolved station, in request order
    pub fn station_descriptions(&self) -> Vec<StationDescription> {
        self.network
            .stations()
            .enumerate()
            .map(|(ordinal, station)| self.describe_station(ordinal, station))
            .collect()
    }

    fn describe_station(&self, ordinal: usize, station: &Station) -> StationDescription {
        let label = self.network.station_label(ordinal);
        let station_urn = station.urn.clone().unwrap_or_else(|| label.clone());
        let short_name = station
            .urn_suffix()
            .map(str::to_string)
            .unwrap_or_else(|| ATTRIBUTE_MISSING.to_string());

        let platform = self.metadata.platform_variable(&station.name);
        let long_name = platform
            .map(|variable| variable.required_attribute(LONG_NAME))
            .unwrap_or_else(|| ATTRIBUTE_MISSING.to_string());
        let wmo_id = platform
            .and_then(|variable| variable.attribute(WMO_CODE))
            .map(str::to_string);

        StationDescription {
            station_urn,
            short_name,
            long_name,
            wmo_id,
            valid_time_begin: self.network.time_begin(ordinal),
            valid_time_end: self.network.time_end(ordinal),
            location: self.station_location(ordinal),
            outputs: self.station_outputs(ordinal, &label),
        }
    }

    /// Station location: a single point for station datasets, the
    /// per-station box for grids
    fn station_location(&self, ordinal: usize) -> StationLocation {
        match self.network.shape() {
            DatasetShape::Grid => StationLocation::Box {
                lower_corner: format!(
                    "{} {}",
                    self.network.lower_latitude(ordinal),
                    self.network.lower_longitude(ordinal)
                ),
                upper_corner: format!(
                    "{} {}",
                    self.network.upper_latitude(ordinal),
                    self.network.upper_longitude(ordinal)
                ),
            },
            _ => StationLocation::Point {
                latitude: self.network.lower_latitude(ordinal),
                longitude: self.network.lower_longitude(ordinal),
            },
        }
    }

    fn station_outputs(&self, ordinal: usize, station_label: &str) -> Vec<VariableOutput> {
        let prefix = self.title_prefix(ordinal);

        self.metadata
            .variables()
            .into_iter()
            .map(|variable| {
                let name = match variable.attribute(STANDARD_NAME) {
                    Some(standard_name) => standard_name.to_string(),
                    None => variable.name.clone(),
                };
                let flattened: String = name
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join("_");

                VariableOutput {
                    title: format!("{}{}:{}", prefix, station_label, flattened),
                    definition: self.metadata.definition(&name),
                    units: variable.required_attribute(UNITS),
                    name,
                }
            })
            .collect()
    }

    /// Scope prefix for output titles
    ///
    /// Multi-station networks scope titles under the network procedure;
    /// a single-station dataset scopes them under the station's own URN
    /// parent.
    fn title_prefix(&self, ordinal: usize) -> String {
        if self.network.station_count() > 1 {
            urn_parent(&self.procedure)
        } else {
            match self.network.station_urn(ordinal) {
                Some(urn) => urn_parent(urn),
                None => urn_parent(&self.procedure),
            }
        }
    }

    fn identification(&self) -> Vec<SmlIdentifier> {
        vec![
            SmlIdentifier {
                name: "networkID".to_string(),
                definition: self.metadata.definition("networkID"),
                value: self.procedure.clone(),
            },
            SmlIdentifier {
                name: "shortName".to_string(),
                definition: self.metadata.definition("shortName"),
                value: self
                    .metadata
                    .global_attribute("id")
                    .unwrap_or("SOS station assets collection of the dataset")
                    .to_string(),
            },
            SmlIdentifier {
                name: "longName".to_string(),
                definition: self.metadata.definition("longName"),
                value: self
                    .metadata
                    .global_attribute("title")
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        format!(
                            "{} Collection of all station assets available in dataset",
                            self.procedure
                        )
                    }),
            },
        ]
    }

    fn classification(&self) -> Vec<SmlClassifier> {
        let mut classifiers = vec![
            SmlClassifier {
                name: "platformType".to_string(),
                definition: self.metadata.definition("platformType"),
                category: "platform".to_string(),
                value: platform_type(&self.procedure),
            },
            SmlClassifier {
                name: "operatorSector".to_string(),
                definition: self.metadata.definition("operatorSector"),
                category: "sector".to_string(),
                value: self.metadata.required_attribute("creator_sector"),
            },
            SmlClassifier {
                name: "publisher".to_string(),
                definition: self.metadata.definition("publisher"),
                category: "organization".to_string(),
                value: self.metadata.required_attribute("publisher_name"),
            },
            SmlClassifier {
                name: "parentNetwork".to_string(),
                definition: self.metadata.definition("parentNetwork"),
                category: "organization".to_string(),
                value: self.metadata.required_attribute(INSTITUTION),
            },
        ];

        // sponsor is optional: emitted only when both contributor attributes
        // are present
        if let (Some(name), Some(role)) = (
            self.metadata.global_attribute("contributor_name"),
            self.metadata.global_attribute("contributor_role"),
        ) {
            classifiers.push(SmlClassifier {
                name: "sponsor".to_string(),
                definition: self.metadata.definition("sponsor"),
                category: "organization".to_string(),
                value: format!("{} - {}", name, role),
            });
        }

        classifiers
    }

    /// Build one responsible-party contact block from `<prefix>_*` global
    /// attributes
    fn contact(&self, role_term: &str, attribute_prefix: &str) -> Contact {
        let attr = |suffix: &str| {
            self.metadata
                .global_attribute(&format!("{}_{}", attribute_prefix, suffix))
        };

        let mut address = BTreeMap::new();
        for (key, suffix) in [
            ("deliveryPoint", "address"),
            ("city", "city"),
            ("administrativeArea", "state"),
            ("postalCode", "zipcode"),
        ] {
            if let Some(value) = attr(suffix) {
                address.insert(key.to_string(), value.to_string());
            }
        }
        address.insert(
            "country".to_string(),
            self.metadata
                .required_attribute(&format!("{}_country", attribute_prefix)),
        );
        address.insert(
            "electronicMailAddress".to_string(),
            self.metadata
                .required_attribute(&format!("{}_email", attribute_prefix)),
        );

        let mut phone = BTreeMap::new();
        if let Some(voice) = attr("phone") {
            phone.insert("voice".to_string(), voice.to_string());
        }

        Contact {
            role: self.metadata.definition(role_term),
            organization: self
                .metadata
                .required_attribute(&format!("{}_name", attribute_prefix)),
            url: attr("url").map(str::to_string),
            address,
            phone,
        }
    }
}

/// Everything up to and including the last colon of a URN; empty when the
/// URN has no colon
fn urn_parent(urn: &str) -> String {
    match urn.rfind(':') {
        Some(position) => urn[..=position].to_string(),
        None => String::new(),
    }
}

/// Platform type encoded as the third segment of an IOOS-style URN
fn platform_type(procedure: &str) -> String {
    procedure
        .split(':')
        .nth(2)
        .map(str::to_string)
        .unwrap_or_else(|| ATTRIBUTE_MISSING.to_string())
}
