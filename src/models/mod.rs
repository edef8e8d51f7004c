pub mod city;
pub mod customer;
pub mod delivery;
pub mod driver;
pub mod restaurant;
