mod helpers;
mod tracking;
