//! Wire encoding for the closed enumerations
//!
//! Clients send and receive categories, priorities, and statuses as small
//! integers. The mapping lives here, at the transport boundary, and nowhere
//! else: IT=0/Facilities=1/General=2, Low=0/Medium=1/High=2,
//! Open=0/InProgress=1/Closed=2.

use helpdesk_core::{Category, Priority, Status};

pub fn category_from_wire(value: u8) -> Option<Category> {
    match value {
        0 => Some(Category::It),
        1 => Some(Category::Facilities),
        2 => Some(Category::General),
        _ => None,
    }
}

pub fn category_to_wire(category: Category) -> u8 {
    match category {
        Category::It => 0,
        Category::Facilities => 1,
        Category::General => 2,
    }
}

pub fn priority_from_wire(value: u8) -> Option<Priority> {
    match value {
        0 => Some(Priority::Low),
        1 => Some(Priority::Medium),
        2 => Some(Priority::High),
        _ => None,
    }
}

pub fn priority_to_wire(priority: Priority) -> u8 {
    match priority {
        Priority::Low => 0,
        Priority::Medium => 1,
        Priority::High => 2,
    }
}

pub fn status_from_wire(value: u8) -> Option<Status> {
    match value {
        0 => Some(Status::Open),
        1 => Some(Status::InProgress),
        2 => Some(Status::Closed),
        _ => None,
    }
}

pub fn status_to_wire(status: Status) -> u8 {
    match status {
        Status::Open => 0,
        Status::InProgress => 1,
        Status::Closed => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_is_stable() {
        assert_eq!(category_from_wire(1), Some(Category::Facilities));
        assert_eq!(priority_to_wire(Priority::High), 2);
        assert_eq!(status_from_wire(2), Some(Status::Closed));
        assert_eq!(status_to_wire(Status::InProgress), 1);
    }

    #[test]
    fn out_of_range_values_refused() {
        assert_eq!(category_from_wire(3), None);
        assert_eq!(priority_from_wire(255), None);
        assert_eq!(status_from_wire(3), None);
    }
}
