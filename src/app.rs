use crate::config::Config;
use crate::datasources::{PlantDataSource, PresetCatalog};
use crate::db::Database;
use crate::error::{PlantOpsError, Result};
use crate::logic::achievements;
use crate::logic::notifications::{self, Notification};
use crate::logic::{compute_schedule, HealthEvaluator};
use crate::models::{
    Achievement, Alert, DwellingType, GardenAction, Plant, PlantDraft, UserLocation, UserProfile,
    WateringSchedule, WeatherSnapshot,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Plants,
    Agenda,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Dashboard),
            '2' => Some(Screen::Plants),
            '3' => Some(Screen::Agenda),
            _ => None,
        }
    }
}

pub struct PlantsState {
    pub selected_index: usize,
    pub adding: bool,
    pub input_buffer: String,
}

impl PlantsState {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            adding: false,
            input_buffer: String::new(),
        }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Keep the cursor on a real row after the list shrinks.
    pub fn clamp(&mut self, len: usize) {
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn start_adding(&mut self) {
        self.adding = true;
        self.input_buffer.clear();
    }

    pub fn cancel_adding(&mut self) {
        self.adding = false;
        self.input_buffer.clear();
    }

    pub fn finish_adding(&mut self) -> String {
        self.adding = false;
        std::mem::take(&mut self.input_buffer)
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,
    pub db: Database,

    // Data
    pub profile: UserProfile,
    pub weather: Option<WeatherSnapshot>,
    pub alerts: Vec<Alert>,
    pub notification: Option<Notification>,

    // Screen states
    pub plants_state: PlantsState,

    // Services
    pub evaluator: HealthEvaluator,
    catalog: Box<dyn PlantDataSource>,

    // UI state
    pub status_message: Option<String>,
    pub refreshing: bool,
    pub needs_refresh: bool,
}

impl App {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let stored = db.load_profile()?;
        let created = stored.is_none();
        let profile = stored.unwrap_or_else(|| profile_from_config(&config));

        let mut app = Self {
            screen: Screen::Dashboard,
            should_quit: false,
            config,
            db,
            profile,
            weather: None,
            alerts: Vec::new(),
            notification: None,
            plants_state: PlantsState::new(),
            evaluator: HealthEvaluator::new(),
            catalog: Box::new(PresetCatalog),
            status_message: None,
            refreshing: false,
            needs_refresh: false,
        };

        if created {
            app.save()?;
            match app.db.profile_backups()?.last() {
                Some(key) => app.set_status(&format!(
                    "Stored garden was unreadable - kept a copy as {}",
                    key
                )),
                None => app.set_status("Created a new garden - press 2 then 'a' to add a plant"),
            }
        }

        Ok(app)
    }

    pub fn with_catalog(mut self, catalog: Box<dyn PlantDataSource>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &dyn PlantDataSource {
        self.catalog.as_ref()
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
        self.set_status("Refreshing weather...");
    }

    pub fn update_weather(&mut self, weather: Option<WeatherSnapshot>) {
        self.weather = weather;
        self.evaluate(Utc::now());
    }

    /// Recompute alerts and the pending notification from current state.
    pub fn evaluate(&mut self, now: DateTime<Utc>) {
        self.alerts = self
            .evaluator
            .aggregate(&self.profile.plants, self.weather.as_ref());

        let due = self
            .schedules(now)
            .iter()
            .filter(|(_, s)| s.is_due())
            .count();

        self.notification = notifications::summarize(&self.alerts, due);
        if let Some(ref n) = self.notification {
            notifications::dispatch(n, self.config.notifications.enabled);
        }
    }

    pub fn schedules(&self, now: DateTime<Utc>) -> Vec<(&Plant, WateringSchedule)> {
        self.profile
            .plants
            .iter()
            .map(|p| (p, compute_schedule(p, self.weather.as_ref(), now)))
            .collect()
    }

    pub fn alerts_for(&self, plant_id: &str) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| a.plant_id == plant_id).collect()
    }

    pub fn selected_plant(&self) -> Option<&Plant> {
        self.profile.plants.get(self.plants_state.selected_index)
    }

    /// Look `query` up in the catalog and add the result to the garden.
    pub fn add_plant(
        &mut self,
        query: &str,
        now: DateTime<Utc>,
    ) -> Result<(Plant, Vec<&'static Achievement>)> {
        let plant = self
            .catalog
            .lookup(query, now)?
            .ok_or_else(|| PlantOpsError::NotFound(format!("no plant matches '{}'", query)))?;

        let unlocked = self.add_plant_profile(plant.clone(), now)?;
        Ok((plant, unlocked))
    }

    /// Add a hand-entered plant, filling unset fields with defaults.
    pub fn add_custom_plant(
        &mut self,
        draft: PlantDraft,
        now: DateTime<Utc>,
    ) -> Result<(Plant, Vec<&'static Achievement>)> {
        let plant = draft
            .into_plant(now)
            .ok_or_else(|| PlantOpsError::InvalidData("a plant needs a common name".into()))?;
        let unlocked = self.add_plant_profile(plant.clone(), now)?;
        Ok((plant, unlocked))
    }

    pub fn add_plant_profile(
        &mut self,
        plant: Plant,
        now: DateTime<Utc>,
    ) -> Result<Vec<&'static Achievement>> {
        tracing::info!(plant = %plant.common_name, id = %plant.id, "Adding plant");
        self.profile.plants.push(plant);
        let unlocked = achievements::unlock(&mut self.profile, GardenAction::PlantAdded);
        self.save()?;
        self.evaluate(now);
        Ok(unlocked)
    }

    pub fn water_plant(&mut self, id: &str, now: DateTime<Utc>) -> Result<Vec<&'static Achievement>> {
        let plant = self
            .profile
            .plant_mut(id)
            .ok_or_else(|| PlantOpsError::NotFound(format!("plant '{}'", id)))?;
        plant.record_watering(now);
        tracing::info!(plant = %plant.common_name, "Watered");

        let unlocked = achievements::unlock(&mut self.profile, GardenAction::Watered);
        self.save()?;
        self.evaluate(now);
        Ok(unlocked)
    }

    pub fn remove_plant(&mut self, id: &str, now: DateTime<Utc>) -> Result<Plant> {
        let idx = self
            .profile
            .plants
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PlantOpsError::NotFound(format!("plant '{}'", id)))?;
        let removed = self.profile.plants.remove(idx);
        tracing::info!(plant = %removed.common_name, "Removed plant");

        self.plants_state.clamp(self.profile.plants.len());
        self.save()?;
        self.evaluate(now);
        Ok(removed)
    }

    /// Resolve a plant by id, id prefix, or case-insensitive common name.
    pub fn find_plant(&self, key: &str) -> Option<&Plant> {
        let lower = key.to_lowercase();
        self.profile
            .plant(key)
            .or_else(|| self.profile.plants.iter().find(|p| p.id.starts_with(key)))
            .or_else(|| {
                self.profile
                    .plants
                    .iter()
                    .find(|p| p.common_name.to_lowercase() == lower)
            })
    }

    fn save(&self) -> Result<()> {
        self.db.save_profile(&self.profile)
    }
}

fn profile_from_config(config: &Config) -> UserProfile {
    let mut profile = UserProfile::new(config.gardener.name.clone()).with_location(UserLocation {
        latitude: config.location.latitude,
        longitude: config.location.longitude,
        city: config.location.city.clone(),
    });
    if let Some(dwelling) = config
        .gardener
        .dwelling_type
        .as_deref()
        .and_then(DwellingType::from_str)
    {
        profile = profile.with_dwelling(dwelling);
    }
    profile
}
