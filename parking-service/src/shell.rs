//! Interactive Shell
//!
//! Text menu for the lot attendant:
//!
//! ```text
//! 1 New Vehicle Entering - Allocate Parking Space
//! 2 Vehicle Exiting - Generate Ticket Price
//! 3 Shutdown System
//! ```
//!
//! Input, output and clock are injected so the whole dialogue can run in
//! tests against an in-memory lot.

use crate::parking::{ParkingError, TicketManager};
use crate::storage::ParkingStore;
use shared::models::{UnknownCategory, VehicleCategory};
use shared::types::Timestamp;
use shared::util::{format_millis, now_millis};
use std::io::{self, BufRead, Write};

pub struct Shell<S: ParkingStore, R: BufRead, W: Write> {
    manager: TicketManager<S>,
    input: R,
    output: W,
    clock: Box<dyn FnMut() -> Timestamp>,
}

impl<S: ParkingStore, R: BufRead, W: Write> Shell<S, R, W> {
    pub fn new(manager: TicketManager<S>, input: R, output: W) -> Self {
        Self {
            manager,
            input,
            output,
            clock: Box::new(now_millis),
        }
    }

    /// Replace the wall clock (tests)
    pub fn with_clock(mut self, clock: impl FnMut() -> Timestamp + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Run the menu loop until "Shutdown" or end of input
    pub fn run(mut self) -> io::Result<()> {
        tracing::info!("App initialized");
        writeln!(self.output, "Welcome to Parking System!")?;

        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            match line.parse::<u32>() {
                Ok(1) => self.incoming_vehicle()?,
                Ok(2) => self.exiting_vehicle()?,
                Ok(3) => {
                    writeln!(self.output, "Exiting from the system!")?;
                    break;
                }
                _ => writeln!(
                    self.output,
                    "Unsupported option. Please enter a number corresponding to the provided menu"
                )?,
            }
        }

        self.output.flush()
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "Please select an option. Simply enter the number to choose an action"
        )?;
        writeln!(self.output, "1 New Vehicle Entering - Allocate Parking Space")?;
        writeln!(self.output, "2 Vehicle Exiting - Generate Ticket Price")?;
        writeln!(self.output, "3 Shutdown System")?;
        self.output.flush()
    }

    /// Next trimmed input line, `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn read_vehicle_category(&mut self) -> io::Result<Option<VehicleCategory>> {
        writeln!(self.output, "Please select vehicle type from menu")?;
        writeln!(self.output, "1 CAR")?;
        writeln!(self.output, "2 BIKE")?;
        let Some(line) = self.read_line()? else {
            return Ok(None);
        };

        let category = line
            .parse::<u32>()
            .map_err(|_| UnknownCategory(line.clone()))
            .and_then(VehicleCategory::from_selection);
        match category {
            Ok(category) => Ok(Some(category)),
            Err(e) => {
                tracing::warn!(input = %line, "Error parsing user input for type of vehicle");
                self.report(&e.into())?;
                Ok(None)
            }
        }
    }

    fn read_vehicle_reg_number(&mut self) -> io::Result<Option<String>> {
        writeln!(
            self.output,
            "Please type the vehicle registration number and press enter key"
        )?;
        match self.read_line()? {
            Some(reg) if !reg.is_empty() => Ok(Some(reg)),
            Some(_) => {
                writeln!(self.output, "Invalid input provided")?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn incoming_vehicle(&mut self) -> io::Result<()> {
        let Some(category) = self.read_vehicle_category()? else {
            return Ok(());
        };
        match self.manager.allocator().count_available(category) {
            Ok(free) => writeln!(self.output, "Available {category} spots: {free}")?,
            Err(e) => tracing::warn!(error = %e, "Unable to count available spots"),
        }
        let Some(reg) = self.read_vehicle_reg_number()? else {
            return Ok(());
        };

        let now = (self.clock)();
        match self.manager.process_entry(&reg, category, now) {
            Ok(entry) => {
                let ticket = &entry.ticket;
                tracing::info!(
                    ticket_id = ticket.id,
                    vehicle = %reg,
                    category = %category,
                    spot_id = ticket.spot_id,
                    recurring = entry.is_recurring,
                    "Vehicle entered"
                );
                if entry.is_recurring {
                    writeln!(
                        self.output,
                        "Welcome back! As a recurring user of our parking lot, you'll benefit from a 5% discount."
                    )?;
                }
                writeln!(self.output, "Generated Ticket and saved in DB")?;
                writeln!(
                    self.output,
                    "Please park your vehicle in spot number: {}",
                    ticket.spot_id
                )?;
                writeln!(
                    self.output,
                    "Recorded in-time for vehicle number: {} is: {}",
                    reg,
                    format_millis(ticket.entry_time)
                )?;
            }
            Err(ParkingError::PersistenceFailure(e)) => {
                tracing::error!(error = %e, vehicle = %reg, "Unable to process incoming vehicle");
                writeln!(
                    self.output,
                    "Unable to process incoming vehicle. Error occurred"
                )?;
            }
            Err(e) => {
                tracing::error!(error = %e, vehicle = %reg, "Unable to process incoming vehicle");
                self.report(&e)?;
            }
        }
        Ok(())
    }

    fn exiting_vehicle(&mut self) -> io::Result<()> {
        let Some(reg) = self.read_vehicle_reg_number()? else {
            return Ok(());
        };

        let now = (self.clock)();
        match self.manager.process_exit(&reg, now) {
            Ok(ticket) => {
                tracing::info!(
                    ticket_id = ticket.id,
                    vehicle = %reg,
                    price = ticket.price,
                    "Vehicle exited"
                );
                writeln!(self.output, "Please pay the parking fare: {:.2}", ticket.price)?;
                writeln!(
                    self.output,
                    "Recorded out-time for vehicle number: {} is: {}",
                    reg,
                    format_millis(now)
                )?;
            }
            Err(e) => {
                tracing::error!(error = %e, vehicle = %reg, "Unable to process exiting vehicle");
                self.report(&e)?;
            }
        }
        Ok(())
    }

    /// Attendant-facing message for a failed request
    ///
    /// Storage failures here are exit-side; entry reports its own.
    fn report(&mut self, err: &ParkingError) -> io::Result<()> {
        match err {
            ParkingError::VehicleAlreadyParked(_) => {
                writeln!(self.output, "This vehicle is already in park")
            }
            ParkingError::VehicleNotParked(_) => writeln!(self.output, "This vehicle is not inside"),
            ParkingError::UnknownCategory(_) => writeln!(self.output, "Incorrect input provided"),
            ParkingError::PersistenceFailure(_) => writeln!(
                self.output,
                "Unable to update ticket information. Error occurred"
            ),
            ParkingError::LotFull(_)
            | ParkingError::InvalidInterval { .. }
            | ParkingError::FareFailed(_) => writeln!(self.output, "{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::FareCalculator;
    use crate::storage::LotStorage;
    use crate::storage::test_support::FlakyStore;
    use std::io::Cursor;

    const T0: Timestamp = 1_700_000_000_000;
    const HOUR: i64 = 60 * 60 * 1000;

    fn create_test_storage() -> LotStorage {
        let storage = LotStorage::open_in_memory().unwrap();
        storage
            .seed_spots(&[(VehicleCategory::Car, 3), (VehicleCategory::Bike, 1)])
            .unwrap();
        storage
    }

    /// Run a scripted session; each call to the clock advances one hour
    fn run_session(storage: &LotStorage, script: &str) -> String {
        let manager = TicketManager::new(storage.clone(), FareCalculator::default());
        let mut output = Vec::new();
        let mut now = T0;
        Shell::new(manager, Cursor::new(script.to_string()), &mut output)
            .with_clock(move || {
                let t = now;
                now += HOUR;
                t
            })
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_shutdown() {
        let storage = create_test_storage();
        let out = run_session(&storage, "3\n");
        assert!(out.starts_with("Welcome to Parking System!"));
        assert!(out.contains("Exiting from the system!"));
    }

    #[test]
    fn test_end_of_input_stops() {
        let storage = create_test_storage();
        let out = run_session(&storage, "");
        assert!(out.contains("3 Shutdown System"));
        assert!(!out.contains("Exiting from the system!"));
    }

    #[test]
    fn test_unsupported_option() {
        let storage = create_test_storage();
        let out = run_session(&storage, "7\nabc\n3\n");
        assert_eq!(out.matches("Unsupported option").count(), 2);
    }

    #[test]
    fn test_entry_then_exit() {
        let storage = create_test_storage();
        let out = run_session(&storage, "1\n1\nABCDEF\n2\nABCDEF\n3\n");

        assert!(out.contains("Available CAR spots: 3"));
        assert!(out.contains("Please park your vehicle in spot number: 1"));
        assert!(out.contains("Recorded in-time for vehicle number: ABCDEF"));
        // Entered at T0, left at T0 + 1h
        assert!(out.contains("Please pay the parking fare: 0.75"));
        assert!(!out.contains("Welcome back!"));

        assert!(storage.find_open_ticket("ABCDEF").unwrap().is_none());
        assert_eq!(storage.count_available(VehicleCategory::Car).unwrap(), 3);
    }

    #[test]
    fn test_recurring_vehicle_is_welcomed_back() {
        let storage = create_test_storage();
        run_session(&storage, "1\n2\nBIKE-1\n2\nBIKE-1\n3\n");

        let out = run_session(&storage, "1\n2\nBIKE-1\n2\nBIKE-1\n3\n");
        assert!(out.contains("Welcome back!"));
        assert!(out.contains("Please pay the parking fare: 0.48"));
    }

    #[test]
    fn test_already_parked() {
        let storage = create_test_storage();
        let out = run_session(&storage, "1\n1\nABCDEF\n1\n1\nABCDEF\n3\n");
        assert!(out.contains("This vehicle is already in park"));
        assert_eq!(storage.count_available(VehicleCategory::Car).unwrap(), 2);
    }

    #[test]
    fn test_not_inside() {
        let storage = create_test_storage();
        let out = run_session(&storage, "2\nGHOST\n3\n");
        assert!(out.contains("This vehicle is not inside"));
    }

    #[test]
    fn test_lot_full() {
        let storage = create_test_storage();
        let out = run_session(&storage, "1\n2\nB1\n1\n2\nB2\n3\n");
        assert!(out.contains("Available BIKE spots: 0"));
        assert!(out.contains("No BIKE spot available"));
        assert!(storage.find_open_ticket("B2").unwrap().is_none());
    }

    #[test]
    fn test_entry_storage_failure_message() {
        let store = FlakyStore::new(create_test_storage());
        store.fail_save_spot.set(true);
        let manager = TicketManager::new(store, FareCalculator::default());
        let mut output = Vec::new();
        Shell::new(manager, Cursor::new("1\n1\nABCDEF\n3\n".to_string()), &mut output)
            .with_clock(|| T0)
            .run()
            .unwrap();
        let out = String::from_utf8(output).unwrap();

        assert!(out.contains("Unable to process incoming vehicle. Error occurred"));
        assert!(!out.contains("Unable to update ticket information"));
        assert!(!out.contains("Please park your vehicle"));
    }

    #[test]
    fn test_exit_storage_failure_message() {
        let storage = create_test_storage();
        run_session(&storage, "1\n1\nABCDEF\n3\n");

        let store = FlakyStore::new(storage.clone());
        store.fail_save_spot.set(true);
        let manager = TicketManager::new(store, FareCalculator::default());
        let mut output = Vec::new();
        Shell::new(manager, Cursor::new("2\nABCDEF\n3\n".to_string()), &mut output)
            .with_clock(|| T0 + HOUR)
            .run()
            .unwrap();
        let out = String::from_utf8(output).unwrap();

        assert!(out.contains("Unable to update ticket information. Error occurred"));
        assert!(storage.find_open_ticket("ABCDEF").unwrap().is_some());
    }

    #[test]
    fn test_bad_vehicle_type() {
        let storage = create_test_storage();
        let out = run_session(&storage, "1\n9\n3\n");
        assert!(out.contains("Incorrect input provided"));
        assert!(!out.contains("registration number"));
    }

    #[test]
    fn test_empty_registration() {
        let storage = create_test_storage();
        let out = run_session(&storage, "1\n1\n   \n3\n");
        assert!(out.contains("Invalid input provided"));
        assert_eq!(storage.count_available(VehicleCategory::Car).unwrap(), 3);
    }
}
