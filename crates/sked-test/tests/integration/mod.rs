mod free_time;
mod helpers;
mod index;
mod persistence;
