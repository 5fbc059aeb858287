mod export;
mod helpers;
mod selection;
